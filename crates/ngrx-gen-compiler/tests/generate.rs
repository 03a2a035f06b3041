//! End-to-end tests: TypeScript source → records → artifact → generated text.

use ngrx_gen_common::{FormatConfig, GenerateConfig};
use ngrx_gen_compiler::ast::DeclarationKind;
use ngrx_gen_compiler::codegen::{CodeArtifact, Printer, Synthesizer};
use ngrx_gen_compiler::extract::{extract_actions, ActionMetadataRecord};
use ngrx_gen_compiler::GenerateError;

const TRUCK: &str = include_str!("fixtures/truck.actions.ts");
const DRIVER: &str = include_str!("fixtures/driver.actions.ts");
const MISSING_TYPE: &str = include_str!("fixtures/missing-type.actions.ts");
const MIXED: &str = include_str!("fixtures/mixed.actions.ts");

const TRUCK_ACTIONS: [&str; 8] = [
    "GetTruckItems",
    "GetTruckItemsSuccess",
    "GetTruckItemsFail",
    "RefreshTruckItems",
    "GetTruckData",
    "GetTruckDataSuccess",
    "GetTruckDataFail",
    "RefreshTruckData",
];

/// Parse and extract, asserting the source is free of syntax errors.
fn records(source: &str, file_name: &str) -> Result<Vec<ActionMetadataRecord>, GenerateError> {
    let (file, diags) = ngrx_gen_compiler::parse(source, file_name);
    assert!(
        !diags.has_errors(),
        "syntax errors: {:?}",
        diags.diagnostics()
    );
    extract_actions(&file, &GenerateConfig::default().marker)
}

fn synthesize(source: &str, file_name: &str) -> Result<CodeArtifact, GenerateError> {
    let config = GenerateConfig::default();
    let records = records(source, file_name)?;
    Synthesizer::new(&config).synthesize(&records, file_name)
}

#[test]
fn truck_interfaces_produce_eight_ordered_records() {
    let records = records(TRUCK, "truck.actions.ts").unwrap();
    let names: Vec<_> = records.iter().map(|r| r.declaration.as_str()).collect();
    assert_eq!(names, TRUCK_ACTIONS);
    assert!(records.iter().all(|r| r.tag.category == "Truck"));
    assert!(records
        .iter()
        .all(|r| r.kind == DeclarationKind::Interface));

    assert_eq!(records[0].tag.name, "Get Truck Items");
    let fields: Vec<_> = records[0]
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.optional))
        .collect();
    assert_eq!(fields, vec![("truckId", false), ("page", true)]);

    // Required before optional even when declared the other way round.
    let fail_fields: Vec<_> = records[2].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fail_fields, vec!["status", "error"]);

    assert_eq!(records[4].tag.name, "Get Truck Data");
    assert_eq!(records[7].tag.name, "Refresh Truck Data");
}

#[test]
fn truck_interfaces_produce_import_and_union() {
    let artifact = synthesize(TRUCK, "truck.actions.ts").unwrap();
    assert_eq!(artifact.import.module_path, "./truck.actions");
    assert_eq!(artifact.import.names, TRUCK_ACTIONS);
    assert_eq!(artifact.alias.name, "TruckActions");
    assert_eq!(artifact.alias.members, TRUCK_ACTIONS);

    let text = Printer::default().render(&artifact);
    let expected = format!(
        "import {{ {} }} from './truck.actions';\n\nexport type TruckActions = {};\n",
        TRUCK_ACTIONS.join(", "),
        TRUCK_ACTIONS.join(" | "),
    );
    assert_eq!(text, expected);
    assert_eq!(text.matches("import ").count(), 1);
    assert_eq!(text.matches("export type ").count(), 1);
}

#[test]
fn truck_output_wraps_at_line_width() {
    let artifact = synthesize(TRUCK, "truck.actions.ts").unwrap();
    let format = FormatConfig {
        line_width: Some(80),
        ..FormatConfig::default()
    };
    let text = Printer::new(&format).render(&artifact);
    assert!(text.starts_with("import {\n  GetTruckItems,\n"));
    assert!(text.contains("} from './truck.actions';\n\nexport type TruckActions =\n  | GetTruckItems\n"));
    assert!(text.ends_with("  | RefreshTruckData;\n"));
    assert!(text.lines().all(|line| line.len() <= 80));
}

#[test]
fn class_actions_skip_unmarked_classes() {
    let records = records(DRIVER, "driver.actions.ts").unwrap();
    let names: Vec<_> = records.iter().map(|r| r.declaration.as_str()).collect();
    assert_eq!(
        names,
        vec!["LoadDrivers", "LoadDriversSuccess", "LoadDriversFail"]
    );
    assert!(records.iter().all(|r| r.fields.is_empty()));
    assert_eq!(records[1].tag.name, "Load Drivers Success");
    assert_eq!(
        records[1].raw_discriminant,
        "readonly type = '[Driver Roster] Load Drivers Success'"
    );

    let artifact = synthesize(DRIVER, "driver.actions.ts").unwrap();
    assert_eq!(artifact.alias.name, "DriverRosterActions");
}

#[test]
fn reducer_skeleton_for_truck_actions() {
    let config = GenerateConfig::default();
    let synthesizer = Synthesizer::new(&config);
    let records = records(TRUCK, "truck.actions.ts").unwrap();
    let artifact = synthesizer.synthesize(&records, "truck.actions.ts").unwrap();
    let reducer = synthesizer
        .synthesize_reducer(&artifact, &records, "truck.actions.generated.ts")
        .unwrap();

    let text = Printer::default().render_reducer(&reducer);
    assert!(text.starts_with("import { TruckActions } from './truck.actions.generated';\n"));
    assert!(text.contains(
        "export function truckReducer<S>(state: S, action: TruckActions): S {"
    ));
    assert_eq!(text.matches("    case '[Truck] ").count(), 8);
    assert!(text.contains("// GetTruckItems: truckId: string, page?: number"));
    assert!(text.contains("    default:\n      return state;\n"));
}

#[test]
fn reducer_cases_match_declared_literals() {
    let source = "export class LoadTruck implements Action {\n  readonly type = '[Truck]  Load Truck';\n}\nexport interface ClearTruck extends Action {\n  readonly type: \"[Truck] Clear  Truck\";\n}\n";
    let config = GenerateConfig::default();
    let synthesizer = Synthesizer::new(&config);
    let records = records(source, "truck.actions.ts").unwrap();
    let artifact = synthesizer.synthesize(&records, "truck.actions.ts").unwrap();
    let reducer = synthesizer
        .synthesize_reducer(&artifact, &records, "truck.actions.generated.ts")
        .unwrap();

    let text = Printer::default().render_reducer(&reducer);
    assert!(text.contains("    case '[Truck]  Load Truck': {\n"), "{text}");
    assert!(text.contains("    case '[Truck] Clear  Truck': {\n"), "{text}");
}

#[test]
fn missing_discriminant_names_declaration() {
    let err = records(MISSING_TYPE, "missing-type.actions.ts").unwrap_err();
    match &err {
        GenerateError::MissingDiscriminant { declaration, span } => {
            assert_eq!(declaration, "Unload");
            assert_eq!(span.start.line, 7);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_diagnostic().span.is_some());
}

#[test]
fn mixed_categories_are_rejected() {
    let err = synthesize(MIXED, "mixed.actions.ts").unwrap_err();
    assert!(matches!(
        err,
        GenerateError::MixedCategories { ref declaration, .. } if declaration == "LoadUser"
    ));
}

#[test]
fn file_without_actions_fails_at_synthesis() {
    let source = "export interface State { trucks: string[] }\nexport const initialState: State = { trucks: [] };\n";
    assert!(records(source, "state.ts").unwrap().is_empty());
    let err = synthesize(source, "state.ts").unwrap_err();
    assert!(matches!(err, GenerateError::EmptyMetadata { .. }));
}

#[test]
fn custom_marker() {
    let source = "export interface Load extends TypedAction { type: '[Truck] Load' }\nexport interface Other extends Action { type: '[Truck] Other' }";
    let (file, diags) = ngrx_gen_compiler::parse(source, "truck.actions.ts");
    assert!(!diags.has_errors());
    let records = extract_actions(&file, "TypedAction").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].declaration, "Load");
}

#[test]
fn syntax_errors_are_reported_with_spans() {
    let (_, diags) = ngrx_gen_compiler::parse(
        "export interface Load extends Action {\n  type: '[Truck] Load';\n",
        "broken.ts",
    );
    assert!(diags.has_errors());
    assert!(diags.diagnostics().iter().all(|d| d.span.is_some()));
}
