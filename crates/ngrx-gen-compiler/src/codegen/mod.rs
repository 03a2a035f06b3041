pub mod case;
pub mod printer;
pub mod synthesizer;

pub use printer::Printer;
pub use synthesizer::{
    module_path, CodeArtifact, ImportSpec, ReducerArtifact, ReducerCase, Synthesizer,
    TypeAliasSpec,
};
