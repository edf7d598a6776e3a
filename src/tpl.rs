use std::collections::HashMap;

/// Resolves `$VARIABLE` references in release config strings
#[derive(Clone, Debug, Default)]
pub struct Tpl {
    variables: HashMap<String, String>,
}

impl Tpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with its value
    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.variables.insert(key.into(), value.into());
    }

    /// Copy of this template with one more variable bound
    pub fn with<K: Into<String>, V: Into<String>>(&self, key: K, value: V) -> Self {
        let mut tpl = self.clone();
        tpl.register(key, value);
        tpl
    }

    /// Substitute every registered variable in `input` in one pass.
    ///
    /// At each `$` the longest matching name wins, so `$PRODUCT_ID` is never
    /// eaten by `$PRODUCT`. Substituted values are not scanned again.
    pub fn parse(&self, input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            result.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let key = self
                .variables
                .keys()
                .filter(|key| after.starts_with(key.as_str()))
                .max_by_key(|key| key.len());

            match key {
                Some(key) => {
                    result.push_str(&self.variables[key]);
                    rest = &after[key.len()..];
                }
                None => {
                    result.push('$');
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// True when `input` references `$key`
    pub fn references(input: &str, key: &str) -> bool {
        input.contains(&format!("${}", key))
    }
}
