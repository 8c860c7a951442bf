use std::collections::HashMap;

use repository::session::{CookieAdapter, CookieOptions};

#[derive(Debug, Default, Clone)]
pub struct MemoryCookies {
    values: HashMap<String, (String, CookieOptions)>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(
            name.to_string(),
            (
                value.to_string(),
                CookieOptions {
                    path: "/".to_string(),
                    max_age: None,
                    http_only: true,
                    secure: false,
                },
            ),
        );
        self
    }

    pub fn options(&self, name: &str) -> Option<&CookieOptions> {
        self.values.get(name).map(|(_, options)| options)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl CookieAdapter for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|(value, _)| value.clone())
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) {
        self.values
            .insert(name.to_string(), (value.to_string(), options.clone()));
    }

    fn remove(&mut self, name: &str, _options: &CookieOptions) {
        self.values.remove(name);
    }
}
