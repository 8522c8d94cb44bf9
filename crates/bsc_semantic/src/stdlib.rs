//! The standard-library callable table.
//!
//! Built-ins are surfaced the same way user callables are: the global
//! scope is backed by a synthesized read-only file declaring every
//! standard-library function with its parameter list, so arity checks
//! and completions need no special casing. The case-insensitive
//! membership oracle used by the shadowing checks is derived from the
//! same table and is process-wide immutable after first use.

use std::rc::Rc;
use std::sync::LazyLock;

use bsc_ast::{BscFile, Callable, FileKind, Parameter};
use bsc_source::SourceRange;
use rustc_hash::FxHashSet;

/// Path of the synthesized built-ins file. Not a real pkg path; it only
/// needs to be stable and sortable.
pub(crate) const GLOBAL_FILE_PATH: &str = "global";

struct GlobalFunction {
    name: &'static str,
    params: &'static [GlobalParam],
    description: Option<&'static str>,
}

struct GlobalParam {
    name: &'static str,
    optional: bool,
}

const fn required(name: &'static str) -> GlobalParam {
    GlobalParam {
        name,
        optional: false,
    }
}

const fn optional(name: &'static str) -> GlobalParam {
    GlobalParam {
        name,
        optional: true,
    }
}

#[rustfmt::skip]
const GLOBAL_FUNCTIONS: &[GlobalFunction] = &[
    GlobalFunction { name: "Abs", params: &[required("x")], description: Some("Returns the absolute value of the argument") },
    GlobalFunction { name: "Asc", params: &[required("letter")], description: Some("Returns the Unicode code point of the first character of a string") },
    GlobalFunction { name: "Atn", params: &[required("x")], description: None },
    GlobalFunction { name: "Box", params: &[required("x")], description: Some("Boxes an intrinsic value into an object") },
    GlobalFunction { name: "Cdbl", params: &[required("x")], description: None },
    GlobalFunction { name: "Chr", params: &[required("ch")], description: Some("Returns a one-character string from a Unicode code point") },
    GlobalFunction { name: "Cint", params: &[required("x")], description: None },
    GlobalFunction { name: "CopyFile", params: &[required("source"), required("destination")], description: None },
    GlobalFunction { name: "Cos", params: &[required("x")], description: None },
    GlobalFunction { name: "CreateDirectory", params: &[required("directory")], description: None },
    GlobalFunction { name: "CreateObject", params: &[required("name"), optional("param2"), optional("param3"), optional("param4")], description: Some("Creates a platform object by component name") },
    GlobalFunction { name: "Csng", params: &[required("x")], description: None },
    GlobalFunction { name: "DeleteDirectory", params: &[required("directory")], description: None },
    GlobalFunction { name: "DeleteFile", params: &[required("file")], description: None },
    GlobalFunction { name: "Eval", params: &[required("code")], description: None },
    GlobalFunction { name: "Exp", params: &[required("x")], description: None },
    GlobalFunction { name: "FindMemberFunction", params: &[required("object"), required("functionName")], description: None },
    GlobalFunction { name: "Fix", params: &[required("x")], description: None },
    GlobalFunction { name: "FormatDrive", params: &[required("drive"), required("filesystem")], description: None },
    GlobalFunction { name: "FormatJson", params: &[required("json"), optional("flags")], description: Some("Serializes a value to JSON text") },
    GlobalFunction { name: "GetGlobalAA", params: &[], description: Some("Returns the global associative array") },
    GlobalFunction { name: "GetInterface", params: &[required("object"), required("interfaceName")], description: None },
    GlobalFunction { name: "GetLastRunCompileError", params: &[], description: None },
    GlobalFunction { name: "GetLastRunRuntimeError", params: &[], description: None },
    GlobalFunction { name: "Instr", params: &[required("start"), required("text"), required("substring")], description: Some("Returns the position of a substring, or zero when absent") },
    GlobalFunction { name: "Int", params: &[required("x")], description: None },
    GlobalFunction { name: "LCase", params: &[required("s")], description: Some("Returns the lowercase form of a string") },
    GlobalFunction { name: "Left", params: &[required("s"), required("n")], description: None },
    GlobalFunction { name: "Len", params: &[required("s")], description: Some("Returns the number of characters in a string") },
    GlobalFunction { name: "ListDir", params: &[required("path")], description: None },
    GlobalFunction { name: "Log", params: &[required("x")], description: None },
    GlobalFunction { name: "MatchFiles", params: &[required("path"), required("patternIn")], description: None },
    GlobalFunction { name: "Mid", params: &[required("s"), required("p"), optional("n")], description: Some("Returns a substring starting at a one-based position") },
    GlobalFunction { name: "MoveFile", params: &[required("source"), required("destination")], description: None },
    GlobalFunction { name: "ParseJson", params: &[required("jsonString")], description: Some("Parses JSON text into a value") },
    GlobalFunction { name: "ReadAsciiFile", params: &[required("filePath")], description: None },
    GlobalFunction { name: "RebootSystem", params: &[], description: None },
    GlobalFunction { name: "Right", params: &[required("s"), required("n")], description: None },
    GlobalFunction { name: "Rnd", params: &[required("range")], description: None },
    GlobalFunction { name: "Run", params: &[required("filename"), optional("args")], description: None },
    GlobalFunction { name: "RunGarbageCollector", params: &[], description: None },
    GlobalFunction { name: "Sgn", params: &[required("x")], description: None },
    GlobalFunction { name: "Sin", params: &[required("x")], description: None },
    GlobalFunction { name: "Sleep", params: &[required("milliseconds")], description: None },
    GlobalFunction { name: "Sqr", params: &[required("x")], description: None },
    GlobalFunction { name: "Str", params: &[required("value")], description: None },
    GlobalFunction { name: "StrI", params: &[required("value"), optional("radix")], description: None },
    GlobalFunction { name: "StrToI", params: &[required("s")], description: None },
    GlobalFunction { name: "Tan", params: &[required("x")], description: None },
    GlobalFunction { name: "Tr", params: &[required("source")], description: Some("Translates a string through the localization catalog") },
    GlobalFunction { name: "Type", params: &[required("variable"), optional("version")], description: None },
    GlobalFunction { name: "UCase", params: &[required("s")], description: Some("Returns the uppercase form of a string") },
    GlobalFunction { name: "UpTime", params: &[required("dummy")], description: None },
    GlobalFunction { name: "Val", params: &[required("s"), optional("radix")], description: None },
    GlobalFunction { name: "Wait", params: &[required("timeout"), required("port")], description: None },
    GlobalFunction { name: "WriteAsciiFile", params: &[required("filePath"), required("text")], description: None },
];

static GLOBAL_CALLABLE_MAP: LazyLock<FxHashSet<String>> = LazyLock::new(|| {
    GLOBAL_FUNCTIONS
        .iter()
        .map(|function| function.name.to_lowercase())
        .collect()
});

/// The case-insensitive membership oracle over standard-library names.
/// Callers must lowercase the probe.
pub fn global_callable_map() -> &'static FxHashSet<String> {
    &GLOBAL_CALLABLE_MAP
}

/// Builds the synthesized file backing the global scope.
pub(crate) fn create_global_file() -> Rc<BscFile> {
    let mut file = BscFile::new(FileKind::BrightScript, GLOBAL_FILE_PATH, GLOBAL_FILE_PATH);
    for function in GLOBAL_FUNCTIONS {
        let mut callable = Callable::new(function.name, SourceRange::INTERPOLATED);
        for param in function.params {
            let parameter = if param.optional {
                Parameter::optional(param.name)
            } else {
                Parameter::required(param.name)
            };
            callable.params.push(parameter);
        }
        if let Some(description) = function.description {
            callable = callable.with_short_description(description);
        }
        file.callables.push(Rc::new(callable));
    }
    Rc::new(file)
}
