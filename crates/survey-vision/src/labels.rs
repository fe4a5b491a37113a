/// Ordered table of class names matching the detector's class channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse one label per line, skipping blank lines (the usual shape of a
    /// `labels.txt` shipped next to a model file).
    pub fn from_lines(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_skips_blanks() {
        let table = LabelTable::from_lines("beaker\n\ngoggle\n top_hat \n");
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(0), Some("beaker"));
        assert_eq!(table.name(2), Some("top_hat"));
        assert_eq!(table.name(3), None);
    }
}
