pub mod derive;
pub mod geo;
pub mod matching;
pub mod parse;
pub mod summarize;
