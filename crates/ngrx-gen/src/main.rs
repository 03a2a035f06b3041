mod diagnostics;
mod logging;
mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use ngrx_gen_common::config::{self, Config, ConfigError};
use ngrx_gen_common::DiagnosticBag;
use ngrx_gen_compiler::codegen::{Printer, Synthesizer};
use ngrx_gen_compiler::extract::extract_actions;
use ngrx_gen_compiler::lexer::Lexer;

use diagnostics::print_diagnostic;

/// ngrx code generator.
///
/// Reads a TypeScript file of ngrx action declarations and generates the
/// union type of all its actions.
#[derive(Parser)]
#[command(
    name = "ngrx",
    version,
    about,
    long_about = "ngrx code generator.\n\nCollects the action declarations of a TypeScript file (interfaces or classes\nextending/implementing Action with a `type: '[Category] Name'` discriminant)\nand writes an import of all of them plus an exported union type.\n\nExamples:\n  ngrx generate action truck.actions.ts     Write truck.actions.generated.ts\n  ngrx g a truck.actions.ts --reducer       Also write a reducer skeleton\n  ngrx g a truck.actions.ts --stdout        Print instead of writing\n  ngrx g a truck.actions.ts --check         Check for errors only"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate code from a source file.
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Generate the action union type of an actions file.
    #[command(visible_alias = "a")]
    Action(ActionArgs),
}

#[derive(Args, Debug)]
struct ActionArgs {
    /// TypeScript file containing the action declarations.
    path: PathBuf,

    /// Also generate a reducer skeleton switching over every action.
    #[arg(short, long)]
    reducer: bool,

    /// Output file path (default: <name>.generated.<ext> beside the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Check for errors without writing anything.
    #[arg(long)]
    check: bool,

    /// Print the generated code to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,

    /// Emit token stream to stdout (debug).
    #[arg(long = "emit-tokens")]
    emit_tokens: bool,

    /// Emit AST to stdout (debug).
    #[arg(long = "emit-ast")]
    emit_ast: bool,

    /// Emit the extracted action metadata as JSON to stdout.
    #[arg(long = "emit-metadata")]
    emit_metadata: bool,

    /// Config file to use instead of searching for ngrx-gen.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));

    let exit_code = match &cli.command {
        Command::Generate {
            target: GenerateTarget::Action(args),
        } => generate_action(args, cli.quiet),
    };
    process::exit(exit_code);
}

fn generate_action(args: &ActionArgs, quiet: bool) -> i32 {
    tracing::debug!(?args, "generate action");

    let source = match fs::read_to_string(&args.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", args.path.display(), e);
            return 1;
        }
    };

    let file_name = args
        .path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // === Config ===
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    // === Lexer (debug) ===
    if args.emit_tokens {
        let (tokens, lex_diags) = Lexer::new(&source, file_name.as_str()).tokenize();
        for token in &tokens {
            println!(
                "{:>4}:{:<3} {:?} {:?}",
                token.span.start.line, token.span.start.column, token.kind, token.lexeme,
            );
        }
        return report(&lex_diags, &source, &file_name, quiet);
    }

    // === Parser ===
    let (file, diags) = ngrx_gen_compiler::parse(&source, &file_name);
    let status = report(&diags, &source, &file_name, quiet);
    if status != 0 {
        return status;
    }

    if args.emit_ast {
        println!("{:#?}", file);
        return 0;
    }

    // === Extraction ===
    let records = match extract_actions(&file, &config.generate.marker) {
        Ok(records) => records,
        Err(e) => {
            print_diagnostic(&e.to_diagnostic(), &source, &file_name);
            return 1;
        }
    };

    if args.emit_metadata {
        return match serde_json::to_string_pretty(&records) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                eprintln!("error: failed to serialize metadata: {}", e);
                1
            }
        };
    }

    // === Synthesis ===
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| output::generated_path(&args.path, &config.generate.output_suffix));
    let module_path = output::import_specifier(&output_path, &args.path);
    tracing::debug!(output = %output_path.display(), import = %module_path, "resolved output");

    let synthesizer = Synthesizer::new(&config.generate);
    let artifact = match synthesizer.synthesize_importing(&records, module_path) {
        Ok(artifact) => artifact,
        Err(e) => {
            print_diagnostic(&e.to_diagnostic(), &source, &file_name);
            return 1;
        }
    };

    let printer = Printer::new(&config.format);
    let mut outputs = vec![(output_path.clone(), printer.render(&artifact))];

    if args.reducer {
        let actions_file = output_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let reducer = match synthesizer.synthesize_reducer(&artifact, &records, &actions_file) {
            Ok(reducer) => reducer,
            Err(e) => {
                print_diagnostic(&e.to_diagnostic(), &source, &file_name);
                return 1;
            }
        };
        let reducer_path =
            output::reducer_path(&args.path, &output_path, &config.generate.output_suffix);
        outputs.push((reducer_path, printer.render_reducer(&reducer)));
    }

    if args.check {
        if !quiet {
            println!("No errors found ({} actions).", records.len());
        }
        return 0;
    }

    if args.stdout {
        let texts: Vec<&str> = outputs.iter().map(|(_, text)| text.as_str()).collect();
        print!("{}", texts.join("\n"));
        return 0;
    }

    write_outputs(&outputs, &args.path)
}

/// `--config` if given, otherwise the nearest ngrx-gen.toml, otherwise the
/// defaults.
fn resolve_config(args: &ActionArgs) -> Result<Config, ConfigError> {
    if let Some(path) = &args.config {
        return config::load_config(path);
    }
    let abs_input = fs::canonicalize(&args.path).unwrap_or_else(|_| args.path.clone());
    match config::find_and_load_config(&abs_input) {
        Err(ConfigError::NotFound(_)) => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
        result => result,
    }
}

/// Render every diagnostic; non-zero when any of them is an error.
fn report(diags: &DiagnosticBag, source: &str, file_name: &str, quiet: bool) -> i32 {
    for diag in diags.diagnostics() {
        if diag.is_error() || !quiet {
            print_diagnostic(diag, source, file_name);
        }
    }
    if diags.has_errors() {
        1
    } else {
        0
    }
}

fn write_outputs(outputs: &[(PathBuf, String)], input: &Path) -> i32 {
    for (path, text) in outputs {
        if let Err(e) = output::write_atomic(path, text) {
            eprintln!("error: could not write '{}': {}", path.display(), e);
            return 1;
        }
        tracing::info!(
            "Generated {} -> {} ({} bytes)",
            input.display(),
            path.display(),
            text.len()
        );
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const TRUCK: &str = "import { Action } from '@ngrx/store';\n\n\
        export interface GetTruckItems extends Action {\n  readonly type: '[Truck] Get Truck Items';\n}\n\n\
        export interface GetTruckItemsSuccess extends Action {\n  readonly type: '[Truck] Get Truck Items Success';\n  items: string[];\n}\n";

    fn action_args(cli: Cli) -> ActionArgs {
        match cli.command {
            Command::Generate {
                target: GenerateTarget::Action(args),
            } => args,
        }
    }

    fn args_for(path: &Path) -> ActionArgs {
        let cli = Cli::parse_from(["ngrx", "generate", "action", path.to_str().unwrap()]);
        action_args(cli)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_aliases() {
        let cli = Cli::parse_from(["ngrx", "g", "a", "truck.actions.ts", "-r", "-o", "out.ts"]);
        let args = action_args(cli);
        assert_eq!(args.path, PathBuf::from("truck.actions.ts"));
        assert!(args.reducer);
        assert_eq!(args.output, Some(PathBuf::from("out.ts")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ngrx", "generate", "action", "a.ts", "--verbose"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn generates_file_beside_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        assert_eq!(generate_action(&args_for(&input), true), 0);

        let generated = fs::read_to_string(dir.path().join("truck.actions.generated.ts")).unwrap();
        assert_eq!(
            generated,
            "import { GetTruckItems, GetTruckItemsSuccess } from './truck.actions';\n\n\
             export type TruckActions = GetTruckItems | GetTruckItemsSuccess;\n"
        );
        assert!(!dir.path().join("truck.actions.reducer.generated.ts").exists());
    }

    #[test]
    fn reducer_flag_writes_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        let mut args = args_for(&input);
        args.reducer = true;
        assert_eq!(generate_action(&args, true), 0);

        let reducer =
            fs::read_to_string(dir.path().join("truck.actions.reducer.generated.ts")).unwrap();
        assert!(reducer.starts_with("import { TruckActions } from './truck.actions.generated';"));
        assert!(reducer.contains("case '[Truck] Get Truck Items Success': {"));
    }

    #[test]
    fn output_in_sibling_directory_imports_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let gen = dir.path().join("gen");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&gen).unwrap();
        let input = src.join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        let mut args = args_for(&input);
        args.output = Some(gen.join("actions.ts"));
        args.reducer = true;
        assert_eq!(generate_action(&args, true), 0);

        let generated = fs::read_to_string(gen.join("actions.ts")).unwrap();
        assert!(
            generated.starts_with(
                "import { GetTruckItems, GetTruckItemsSuccess } from '../src/truck.actions';"
            ),
            "{generated}"
        );
        let reducer = fs::read_to_string(gen.join("truck.actions.reducer.generated.ts")).unwrap();
        assert!(reducer.starts_with("import { TruckActions } from './actions';"));
    }

    #[test]
    fn config_file_is_discovered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ngrx-gen.toml"),
            "[generate]\nalias_suffix = \"Union\"\noutput_suffix = \"gen\"\n\n[format]\nquote = \"double\"\nsemicolons = false\n",
        )
        .unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        let input = src.join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        assert_eq!(generate_action(&args_for(&input), true), 0);

        let generated = fs::read_to_string(src.join("truck.actions.gen.ts")).unwrap();
        assert!(generated.contains("from \"./truck.actions\"\n"));
        assert!(generated.contains("export type TruckUnion = GetTruckItems | GetTruckItemsSuccess\n"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ngrx-gen.toml"), "[generate]\nunknown = 1\n").unwrap();
        let input = dir.path().join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        assert_eq!(generate_action(&args_for(&input), true), 1);
        assert!(!dir.path().join("truck.actions.generated.ts").exists());
    }

    #[test]
    fn failure_leaves_existing_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("truck.actions.ts");
        fs::write(&input, "export interface Load extends Action { id: string }\n").unwrap();
        let output = dir.path().join("truck.actions.generated.ts");
        fs::write(&output, "previous\n").unwrap();

        assert_eq!(generate_action(&args_for(&input), true), 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
    }

    #[test]
    fn check_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("truck.actions.ts");
        fs::write(&input, TRUCK).unwrap();

        let mut args = args_for(&input);
        args.check = true;
        args.reducer = true;
        assert_eq!(generate_action(&args, true), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn syntax_error_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.ts");
        fs::write(&input, "export interface Load extends Action {\n  type: '[A] a'\n").unwrap();
        assert_eq!(generate_action(&args_for(&input), true), 1);
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(&dir.path().join("nope.ts"));
        assert_eq!(generate_action(&args, true), 1);
    }
}
