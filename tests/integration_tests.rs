//! End-to-end scenarios: facts → extraction → diff → report.

use abi_tools::extractor::{
    EnumFact, FunctionFact, InMemorySource, MethodRefFact, RecordFact, TranslationUnitFacts,
    TypeRefFact, VariableFact,
};
use abi_tools::model::Linkage;
use abi_tools::reports::{create_reporter_with_options, ReportConfig};
use abi_tools::{
    AbiRepresentation, Category, ChangeKind, CompatibilityReport, DiffEngine, Extractor,
    FunctionMatching, Impact, ReportFormat, Verdict,
};

fn extract(facts: TranslationUnitFacts) -> AbiRepresentation {
    Extractor::new()
        .extract(&InMemorySource::new(facts))
        .expect("facts should extract")
}

fn int() -> TypeRefFact {
    TypeRefFact::named("int")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_struct_grows_a_field() {
    let old = extract(
        TranslationUnitFacts::new("s.h").with(RecordFact::complete("S", 32, 32).field("a", int(), 0)),
    );
    let new = extract(
        TranslationUnitFacts::new("s.h").with(
            RecordFact::complete("S", 64, 32)
                .field("a", int(), 0)
                .field("b", int(), 32),
        ),
    );

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 2, "{:#?}", diff.entries);

    let size = &diff.entries[0];
    assert_eq!(size.uid.as_str(), "S");
    assert_eq!(size.kind, ChangeKind::Changed);
    assert_eq!(size.impact, Impact::Breaking);
    assert!(size.member.is_none());
    assert!(size.detail.contains("32 → 64"));

    let field = &diff.entries[1];
    assert_eq!(field.kind, ChangeKind::Added);
    assert_eq!(field.impact, Impact::NonBreaking);
    assert_eq!(field.member.as_deref(), Some("b"));

    let report = CompatibilityReport::from_diff(&diff);
    assert_eq!(report.verdict, Verdict::Incompatible);
}

#[test]
fn scenario_external_function_removed() {
    let f = FunctionFact::new("f", int(), vec![int()]);
    let old = extract(TranslationUnitFacts::new("f.h").with(f));
    let new = extract(TranslationUnitFacts::new("f.h"));

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 1);
    let entry = &diff.entries[0];
    assert_eq!(entry.uid.as_str(), "f(int)");
    assert_eq!(entry.category, Category::Functions);
    assert_eq!(entry.kind, ChangeKind::Removed);
    assert_eq!(entry.impact, Impact::Breaking);
}

#[test]
fn scenario_enumerator_value_changed() {
    let old = extract(TranslationUnitFacts::new("c.h").with(EnumFact::new("Color").enumerator("RED", 1)));
    let new = extract(TranslationUnitFacts::new("c.h").with(EnumFact::new("Color").enumerator("RED", 2)));

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 1);
    let entry = &diff.entries[0];
    assert_eq!(entry.category, Category::Enums);
    assert_eq!(entry.kind, ChangeKind::Changed);
    assert_eq!(entry.impact, Impact::Breaking);
    assert_eq!(entry.member.as_deref(), Some("RED"));
}

#[test]
fn scenario_enumerator_appended() {
    let base = || EnumFact::new("Color").enumerator("RED", 1).enumerator("GREEN", 2);
    let old = extract(TranslationUnitFacts::new("c.h").with(base()));
    let new = extract(TranslationUnitFacts::new("c.h").with(base().enumerator("BLUE", 3)));

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 1);
    assert_eq!(diff.entries[0].kind, ChangeKind::Added);
    assert_eq!(diff.entries[0].impact, Impact::NonBreaking);
    assert_eq!(diff.entries[0].member.as_deref(), Some("BLUE"));

    let report = CompatibilityReport::from_diff(&diff);
    assert_eq!(report.verdict, Verdict::Compatible);
}

#[test]
fn scenario_virtual_methods_swapped() {
    let draw = || MethodRefFact::new("Shape::draw", Vec::new());
    let area = || MethodRefFact::new("Shape::area", Vec::new());
    let old = extract(
        TranslationUnitFacts::new("shape.h")
            .with(RecordFact::complete("Shape", 64, 64).virtual_method(draw()).virtual_method(area())),
    );
    let new = extract(
        TranslationUnitFacts::new("shape.h")
            .with(RecordFact::complete("Shape", 64, 64).virtual_method(area()).virtual_method(draw())),
    );

    let diff = DiffEngine::new().compare(&old, &new);
    let entries: Vec<_> = diff.for_uid("Shape").collect();
    assert_eq!(entries.len(), 1, "{entries:#?}");
    assert_eq!(entries[0].category, Category::Records);
    assert_eq!(entries[0].kind, ChangeKind::Changed);
    assert_eq!(entries[0].impact, Impact::Breaking);
    assert_eq!(entries[0].member.as_deref(), Some("vtable"));
}

// ============================================================================
// Cross-cutting behavior
// ============================================================================

#[test]
fn verdict_ignores_non_breaking_volume() {
    let old = extract(TranslationUnitFacts::new("api.h"));
    let mut facts = TranslationUnitFacts::new("api.h");
    for i in 0..20 {
        facts = facts.with(FunctionFact::new(format!("fn_{i}"), int(), Vec::new()));
    }
    let new = extract(facts);

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.summary.non_breaking, 20);
    assert!(CompatibilityReport::from_diff(&diff).is_compatible());
}

#[test]
fn internal_linkage_is_not_part_of_the_contract() {
    let mut helper = FunctionFact::new("helper", int(), Vec::new());
    helper.linkage = Linkage::Internal;
    let old = extract(TranslationUnitFacts::new("h.h").with(helper));
    let new = extract(TranslationUnitFacts::new("h.h"));

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 1);
    assert_eq!(diff.entries[0].impact, Impact::Informational);
}

#[test]
fn global_variable_type_change_is_breaking() {
    let var = |ty: &str| VariableFact {
        name: "g_count".to_string(),
        type_ref: TypeRefFact::named(ty),
        linkage: Linkage::External,
    };
    let old = extract(TranslationUnitFacts::new("g.h").with(var("int")));
    let new = extract(TranslationUnitFacts::new("g.h").with(var("long long")));

    let diff = DiffEngine::new().compare(&old, &new);
    assert_eq!(diff.entries.len(), 1);
    assert_eq!(diff.entries[0].category, Category::GlobalVars);
    assert!(diff.entries[0].is_breaking());
}

#[test]
fn builtin_spellings_share_a_uid() {
    let old = extract(
        TranslationUnitFacts::new("u.h")
            .with(FunctionFact::new("scale", int(), vec![TypeRefFact::named("unsigned")])),
    );
    let new = extract(
        TranslationUnitFacts::new("u.h")
            .with(FunctionFact::new("scale", int(), vec![TypeRefFact::named("unsigned int")])),
    );
    assert!(DiffEngine::new().compare(&old, &new).is_empty());
}

#[test]
fn name_matching_pairs_changed_signatures() {
    let old = extract(TranslationUnitFacts::new("f.h").with(FunctionFact::new("f", int(), vec![int()])));
    let new = extract(
        TranslationUnitFacts::new("f.h")
            .with(FunctionFact::new("f", int(), vec![TypeRefFact::named("long")])),
    );

    let by_uid = DiffEngine::new().compare(&old, &new);
    let kinds: Vec<ChangeKind> = by_uid.entries.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&ChangeKind::Removed));
    assert!(kinds.contains(&ChangeKind::Added));

    let by_name = DiffEngine::new()
        .with_function_matching(FunctionMatching::ByName)
        .compare(&old, &new);
    assert!(by_name.entries.iter().all(|e| e.kind == ChangeKind::Changed));
    assert!(by_name.has_breaking());
}

#[test]
fn every_format_renders_the_same_report() {
    let old = extract(TranslationUnitFacts::new("c.h").with(EnumFact::new("Color").enumerator("RED", 1)));
    let new = extract(
        TranslationUnitFacts::new("c.h")
            .with(EnumFact::new("Color").enumerator("RED", 2).enumerator("BLUE", 3)),
    );
    let diff = DiffEngine::new().compare(&old, &new);
    let report = CompatibilityReport::from_diff(&diff);
    let config = ReportConfig::default();

    for format in [
        ReportFormat::Summary,
        ReportFormat::Json,
        ReportFormat::Sarif,
        ReportFormat::Markdown,
        ReportFormat::Table,
        ReportFormat::Csv,
    ] {
        let reporter = create_reporter_with_options(format, false);
        assert_eq!(reporter.format(), format);
        let rendered = reporter.generate(&report, &config).expect("render");
        assert!(rendered.contains("Color"), "{format} lacks the enum:\n{rendered}");
    }
}
