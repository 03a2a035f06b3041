use ngrx_gen_common::{FormatConfig, QuoteStyle};

use super::synthesizer::{CodeArtifact, ImportSpec, ReducerArtifact, TypeAliasSpec};

const INDENT: &str = "  ";

/// Renders synthesized artifacts as TypeScript source.
pub struct Printer<'c> {
    format: &'c FormatConfig,
}

impl<'c> Printer<'c> {
    pub fn new(format: &'c FormatConfig) -> Self {
        Self { format }
    }

    /// The generated actions file: the import, a blank line, the alias.
    pub fn render(&self, artifact: &CodeArtifact) -> String {
        let mut out = String::new();
        out.push_str(&self.import(&artifact.import));
        out.push('\n');
        out.push_str(&self.type_alias(&artifact.alias));
        out
    }

    /// The generated reducer file.
    pub fn render_reducer(&self, reducer: &ReducerArtifact) -> String {
        let semi = self.semicolon();
        let mut out = String::new();
        out.push_str(&self.import(&reducer.import));
        out.push('\n');
        out.push_str(&format!(
            "export function {}<S>(state: S, action: {}): S {{\n",
            reducer.function_name, reducer.action_type
        ));
        out.push_str(&format!("{INDENT}switch (action.type) {{\n"));
        for case in &reducer.cases {
            out.push_str(&format!(
                "{INDENT}{INDENT}case {}: {{\n",
                self.quote(&case.discriminant)
            ));
            if !case.fields.is_empty() {
                let fields: Vec<String> = case
                    .fields
                    .iter()
                    .map(|field| {
                        let optional = if field.optional { "?" } else { "" };
                        match &field.type_text {
                            Some(ty) => format!("{}{}: {}", field.name, optional, ty),
                            None => format!("{}{}", field.name, optional),
                        }
                    })
                    .collect();
                out.push_str(&format!(
                    "{INDENT}{INDENT}{INDENT}// {}: {}\n",
                    case.declaration,
                    fields.join(", ")
                ));
            }
            out.push_str(&format!("{INDENT}{INDENT}{INDENT}return state{semi}\n"));
            out.push_str(&format!("{INDENT}{INDENT}}}\n"));
        }
        out.push_str(&format!("{INDENT}{INDENT}default:\n"));
        out.push_str(&format!("{INDENT}{INDENT}{INDENT}return state{semi}\n"));
        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str("}\n");
        out
    }

    fn import(&self, import: &ImportSpec) -> String {
        let semi = self.semicolon();
        let from = self.quote(&import.module_path);
        let single = format!("import {{ {} }} from {from}{semi}", import.names.join(", "));
        if self.fits(&single) || import.names.len() < 2 {
            return single + "\n";
        }
        let mut out = String::from("import {\n");
        for name in &import.names {
            out.push_str(&format!("{INDENT}{name},\n"));
        }
        out.push_str(&format!("}} from {from}{semi}\n"));
        out
    }

    fn type_alias(&self, alias: &TypeAliasSpec) -> String {
        let semi = self.semicolon();
        let export = if alias.exported { "export " } else { "" };
        let head = format!("{export}type {} =", alias.name);
        let single = format!("{head} {}{semi}", alias.members.join(" | "));
        if self.fits(&single) || alias.members.len() < 2 {
            return single + "\n";
        }
        let mut out = head;
        out.push('\n');
        let last = alias.members.len() - 1;
        for (i, member) in alias.members.iter().enumerate() {
            let end = if i == last { semi } else { "" };
            out.push_str(&format!("{INDENT}| {member}{end}\n"));
        }
        out
    }

    fn fits(&self, line: &str) -> bool {
        self.format
            .line_width
            .map_or(true, |width| line.chars().count() <= width)
    }

    fn semicolon(&self) -> &'static str {
        if self.format.semicolons {
            ";"
        } else {
            ""
        }
    }

    /// A string literal in the configured quote style.
    fn quote(&self, value: &str) -> String {
        let quote = self.format.quote.as_char();
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}

impl Default for Printer<'static> {
    fn default() -> Self {
        static DEFAULT_FORMAT: FormatConfig = FormatConfig {
            quote: QuoteStyle::Single,
            semicolons: true,
            line_width: None,
        };
        Self::new(&DEFAULT_FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::synthesizer::ReducerCase;
    use crate::extract::Field;

    fn artifact(names: &[&str]) -> CodeArtifact {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        CodeArtifact {
            import: ImportSpec {
                module_path: "./truck.actions".to_string(),
                names: names.clone(),
            },
            alias: TypeAliasSpec {
                name: "TruckActions".to_string(),
                exported: true,
                members: names,
            },
        }
    }

    #[test]
    fn default_layout() {
        let out = Printer::default().render(&artifact(&["GetTruckItems", "GetTruckData"]));
        assert_eq!(
            out,
            "import { GetTruckItems, GetTruckData } from './truck.actions';\n\
             \n\
             export type TruckActions = GetTruckItems | GetTruckData;\n"
        );
    }

    #[test]
    fn double_quotes_without_semicolons() {
        let format = FormatConfig {
            quote: QuoteStyle::Double,
            semicolons: false,
            line_width: None,
        };
        let out = Printer::new(&format).render(&artifact(&["A"]));
        assert_eq!(
            out,
            "import { A } from \"./truck.actions\"\n\nexport type TruckActions = A\n"
        );
    }

    #[test]
    fn breaks_long_statements() {
        let format = FormatConfig {
            line_width: Some(40),
            ..FormatConfig::default()
        };
        let out = Printer::new(&format).render(&artifact(&["GetTruckItems", "GetTruckData"]));
        assert_eq!(
            out,
            "import {\n  GetTruckItems,\n  GetTruckData,\n} from './truck.actions';\n\
             \n\
             export type TruckActions =\n  | GetTruckItems\n  | GetTruckData;\n"
        );
    }

    #[test]
    fn single_name_never_breaks() {
        let format = FormatConfig {
            line_width: Some(10),
            ..FormatConfig::default()
        };
        let out = Printer::new(&format).render(&artifact(&["GetTruckItems"]));
        assert_eq!(
            out,
            "import { GetTruckItems } from './truck.actions';\n\nexport type TruckActions = GetTruckItems;\n"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let printer = Printer::default();
        assert_eq!(printer.quote("[Truck] Driver's Load"), "'[Truck] Driver\\'s Load'");
        assert_eq!(printer.quote("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn reducer_layout() {
        let reducer = ReducerArtifact {
            import: ImportSpec {
                module_path: "./truck.actions.generated".to_string(),
                names: vec!["TruckActions".to_string()],
            },
            function_name: "truckReducer".to_string(),
            action_type: "TruckActions".to_string(),
            cases: vec![
                ReducerCase {
                    discriminant: "[Truck] Get Truck Items".to_string(),
                    declaration: "GetTruckItems".to_string(),
                    fields: Vec::new(),
                },
                ReducerCase {
                    discriminant: "[Truck] Get Truck Items Success".to_string(),
                    declaration: "GetTruckItemsSuccess".to_string(),
                    fields: vec![
                        Field {
                            name: "items".to_string(),
                            optional: false,
                            type_text: Some("Item[]".to_string()),
                        },
                        Field {
                            name: "page".to_string(),
                            optional: true,
                            type_text: None,
                        },
                    ],
                },
            ],
        };
        let out = Printer::default().render_reducer(&reducer);
        let expected = "\
import { TruckActions } from './truck.actions.generated';

export function truckReducer<S>(state: S, action: TruckActions): S {
  switch (action.type) {
    case '[Truck] Get Truck Items': {
      return state;
    }
    case '[Truck] Get Truck Items Success': {
      // GetTruckItemsSuccess: items: Item[], page?
      return state;
    }
    default:
      return state;
  }
}
";
        assert_eq!(out, expected);
    }
}
