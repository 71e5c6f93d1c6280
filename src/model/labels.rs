//! Class label table
//!
//! One label per line in output index order. Lines may carry a leading
//! WordNet synset id ("n01440764 tench, Tinca tinca"), which is dropped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn parse(text: &str) -> Result<Self, String> {
        let labels: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_synset(line).to_string())
            .collect();

        if labels.is_empty() {
            return Err("label file is empty".to_string());
        }

        Ok(Self(labels))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Label for an output index; unknown indices get a placeholder
    pub fn get(&self, index: usize) -> String {
        self.0
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("class {}", index))
    }
}

fn strip_synset(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((id, rest)) if is_synset_id(id) => rest.trim_start(),
        _ => line,
    }
}

fn is_synset_id(token: &str) -> bool {
    token.len() == 9
        && token.starts_with('n')
        && token[1..].chars().all(|c| c.is_ascii_digit())
}
