//! End-to-end validation behavior through the public API: the
//! diagnostic scenarios, revalidation semantics, plugin dispatch and
//! host filtering.

use std::cell::RefCell;
use std::rc::Rc;

use bsc_ast::{Callable, FunctionCall, FunctionScope, ScriptImport};
use bsc_diagnostics::{Diagnostic, Severity};
use bsc_source::SourceRange;
use bsc_semantic::testing::TestProgram;
use bsc_semantic::{
    AnalysisPlugin, BsDiagnostic, ClassValidator, Db, Scope, ScopeValidationEvent,
};

fn diagnostic_report(program: &TestProgram, scope_name: &str) -> Vec<(u32, String)> {
    program
        .scope(scope_name)
        .get_diagnostics(program)
        .iter()
        .map(|entry| (entry.code(), entry.file.pkg_path.clone()))
        .collect()
}

#[test]
fn unknown_call_scenario() {
    let mut program = TestProgram::new();
    program.add_file(
        TestProgram::script_file("pkg:/source/a.brs")
            .with_callable(Callable::new("main", SourceRange::span(0, 4, 0, 8)))
            .with_function_scope(FunctionScope::named("main", SourceRange::span(0, 0, 2, 7)))
            .with_function_call(FunctionCall::new("foo", SourceRange::span(1, 4, 1, 7))),
    );
    program.create_scope("main", &["pkg:/source/a.brs"]);
    program.validate(false);

    let diagnostics = program.scope("main").get_diagnostics(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), 1001);
    assert_eq!(diagnostics[0].range(), SourceRange::span(1, 4, 1, 7));
    assert_eq!(
        diagnostics[0].message(),
        "Cannot find function with name 'foo' when this file is included in scope 'main'"
    );
}

#[test]
fn arity_scenario() {
    let mut program = TestProgram::new();
    program.add_file(
        TestProgram::script_file("pkg:/source/a.brs")
            .with_callable(
                Callable::new("greet", SourceRange::INTERPOLATED)
                    .param("name")
                    .optional_param("prefix"),
            )
            .with_function_call(
                FunctionCall::new("greet", SourceRange::span(4, 4, 4, 9)).with_args(3),
            ),
    );
    program.create_scope("main", &["pkg:/source/a.brs"]);
    program.validate(false);

    let diagnostics = program.scope("main").get_diagnostics(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), 1002);
    assert_eq!(diagnostics[0].message(), "Expected 1-2 arguments, but got 3");
}

#[test]
fn duplicate_scenario_orders_by_declaring_file_path() {
    let mut program = TestProgram::new();
    program.add_file(
        TestProgram::script_file("pkg:/source/second.brs")
            .with_callable(Callable::new("run", SourceRange::INTERPOLATED)),
    );
    program.add_file(
        TestProgram::script_file("pkg:/source/first.brs")
            .with_callable(Callable::new("run", SourceRange::INTERPOLATED)),
    );
    program.create_scope("main", &["pkg:/source/second.brs", "pkg:/source/first.brs"]);
    program.validate(false);

    assert_eq!(
        diagnostic_report(&program, "main"),
        vec![
            (1003, "pkg:/source/first.brs".to_string()),
            (1003, "pkg:/source/second.brs".to_string()),
        ]
    );
}

#[test]
fn script_import_case_mismatch_scenario() {
    let mut program = TestProgram::new();
    program.add_file(TestProgram::script_file("pkg:/lib/Foo.brs"));
    program.add_file(
        TestProgram::script_file("pkg:/source/main.brs").with_script_import(ScriptImport::new(
            "Pkg:/Lib/foo.brs",
            SourceRange::span(0, 0, 0, 16),
        )),
    );
    program.create_scope("main", &["pkg:/source/main.brs", "pkg:/lib/Foo.brs"]);
    program.validate(false);

    let diagnostics = program.scope("main").get_diagnostics(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), 1005);
    assert!(diagnostics[0].message().contains("'pkg:/lib/Foo.brs'"));
}

#[test]
fn repeated_validation_is_idempotent() {
    let mut program = TestProgram::new();
    program.add_file(
        TestProgram::script_file("pkg:/source/a.brs")
            .with_function_call(FunctionCall::new("foo", SourceRange::INTERPOLATED)),
    );
    program.create_scope("main", &["pkg:/source/a.brs"]);

    program.validate(false);
    let first = diagnostic_report(&program, "main");

    program.validate(false);
    assert_eq!(diagnostic_report(&program, "main"), first);

    program.scope("main").invalidate();
    assert!(!program.scope("main").is_validated());
    program.validate(false);
    assert_eq!(diagnostic_report(&program, "main"), first);
}

#[test]
fn diagnostics_depend_on_final_state_not_mutation_order() {
    let build_one = |reversed: bool| {
        let mut program = TestProgram::new();
        program.add_file(
            TestProgram::script_file("pkg:/source/a.brs")
                .with_callable(Callable::new("run", SourceRange::INTERPOLATED)),
        );
        program.add_file(
            TestProgram::script_file("pkg:/source/b.brs")
                .with_callable(Callable::new("run", SourceRange::INTERPOLATED)),
        );
        if reversed {
            program.create_scope("main", &["pkg:/source/b.brs"]);
            program.graph_mut().add_edge("scope:main", "pkg:/source/zz.brs");
            program.graph_mut().add_edge("scope:main", "pkg:/source/a.brs");
            program
                .graph_mut()
                .remove_edge("scope:main", "pkg:/source/zz.brs");
        } else {
            program.create_scope("main", &["pkg:/source/a.brs", "pkg:/source/b.brs"]);
        }
        program.validate(false);
        let mut report = diagnostic_report(&program, "main");
        report.sort();
        report
    };

    assert_eq!(build_one(false), build_one(true));
}

#[derive(Default)]
struct RecordingPlugin {
    log: Rc<RefCell<Vec<String>>>,
}

impl AnalysisPlugin for RecordingPlugin {
    fn before_scope_validate(&mut self, event: &ScopeValidationEvent<'_>) {
        self.log
            .borrow_mut()
            .push(format!("before:{}", event.scope.name()));
    }

    fn after_scope_validate(&mut self, event: &ScopeValidationEvent<'_>) {
        self.log
            .borrow_mut()
            .push(format!("after:{}", event.scope.name()));
        if let Some(file) = event.files.first() {
            event.scope.add_diagnostics([BsDiagnostic::new(
                Diagnostic {
                    code: 9100,
                    severity: Severity::Information,
                    message: "plugin note".to_string(),
                    range: SourceRange::INTERPOLATED,
                    related_information: Vec::new(),
                },
                Rc::clone(file),
            )]);
        }
    }
}

#[test]
fn plugins_fire_parent_first_and_may_contribute() {
    let mut program = TestProgram::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    program.register_plugin(Box::new(RecordingPlugin {
        log: Rc::clone(&log),
    }));

    program.add_file(
        TestProgram::xml_file("pkg:/components/Base.xml").with_component("Base", None),
    );
    program.add_file(
        TestProgram::xml_file("pkg:/components/Child.xml").with_component("Child", Some("Base")),
    );
    program.create_component_scope("pkg:/components/Base.xml");
    program.create_component_scope("pkg:/components/Child.xml");

    program
        .scope("pkg:/components/Child.xml")
        .validate(&program, false);

    assert_eq!(
        *log.borrow(),
        vec![
            "before:global",
            "after:global",
            "before:pkg:/components/Base.xml",
            "after:pkg:/components/Base.xml",
            "before:pkg:/components/Child.xml",
            "after:pkg:/components/Child.xml",
        ]
    );

    let contributed: Vec<u32> = program
        .scope("pkg:/components/Child.xml")
        .get_diagnostics(&program)
        .iter()
        .map(bsc_semantic::BsDiagnostic::code)
        .collect();
    assert_eq!(contributed, vec![9100]);
}

struct StubClassValidator {
    produced: RefCell<Vec<BsDiagnostic>>,
}

impl ClassValidator for StubClassValidator {
    fn validate(&self, db: &dyn Db, scope: &Scope) {
        let mut produced = self.produced.borrow_mut();
        produced.clear();
        if scope.name() != "main" {
            return;
        }
        if let Some(file) = scope.get_own_files(db).first() {
            produced.push(BsDiagnostic::new(
                Diagnostic {
                    code: 9000,
                    severity: Severity::Error,
                    message: "circular class inheritance".to_string(),
                    range: SourceRange::INTERPOLATED,
                    related_information: Vec::new(),
                },
                Rc::clone(file),
            ));
        }
    }

    fn diagnostics(&self) -> Vec<BsDiagnostic> {
        self.produced.borrow().clone()
    }
}

#[test]
fn class_validator_diagnostics_are_appended() {
    let mut program = TestProgram::new();
    program.set_class_validator(Box::new(StubClassValidator {
        produced: RefCell::new(Vec::new()),
    }));
    program.add_file(TestProgram::script_file("pkg:/source/a.brs"));
    program.create_scope("main", &["pkg:/source/a.brs"]);
    program.validate(false);

    let diagnostics = program.scope("main").get_diagnostics(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), 9000);
    assert_eq!(diagnostics[0].severity(), Severity::Error);
}

#[test]
fn suppression_and_severity_overrides_apply_in_order() {
    let mut program = TestProgram::new();
    program.add_file(
        TestProgram::script_file("pkg:/source/a.brs")
            .with_function_call(FunctionCall::new("foo", SourceRange::INTERPOLATED))
            .with_function_call(FunctionCall::new("UCase", SourceRange::INTERPOLATED)),
    );
    program.create_scope("main", &["pkg:/source/a.brs"]);
    program.validate(false);

    // baseline: unknown call (error) + arity mismatch (error)
    let baseline = program.scope("main").get_diagnostics(&program);
    assert_eq!(baseline.len(), 2);

    program.override_severity(1001, Severity::Warning);
    let adjusted = program.scope("main").get_diagnostics(&program);
    assert_eq!(adjusted[0].severity(), Severity::Warning);

    program.suppress_code(1001);
    program.suppress_code(1002);
    assert!(program.scope("main").get_diagnostics(&program).is_empty());
}

#[test]
fn file_parse_diagnostics_are_merged() {
    let mut program = TestProgram::new();
    program.add_file(TestProgram::script_file("pkg:/source/a.brs").with_diagnostic(
        Diagnostic {
            code: 9200,
            severity: Severity::Error,
            message: "unexpected token".to_string(),
            range: SourceRange::span(0, 0, 0, 1),
            related_information: Vec::new(),
        },
    ));
    program.create_scope("main", &["pkg:/source/a.brs"]);
    program.validate(false);

    let report = diagnostic_report(&program, "main");
    assert_eq!(report, vec![(9200, "pkg:/source/a.brs".to_string())]);
}

#[test]
fn force_revalidation_reruns_the_pipeline() {
    let mut program = TestProgram::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    program.register_plugin(Box::new(RecordingPlugin {
        log: Rc::clone(&log),
    }));
    program.create_scope("main", &[]);

    program.scope("main").validate(&program, false);
    program.scope("main").validate(&program, false);
    let after_two = log.borrow().len();

    program.scope("main").validate(&program, true);
    assert!(log.borrow().len() > after_two);
}
