use crate::parser::LineKind;

pub trait Tokenize {
    fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + Clone + 'a;
}

pub trait ClassifyLine {
    fn classify(&self, line: &str) -> LineKind;
}
