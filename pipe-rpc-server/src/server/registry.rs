use std::collections::HashMap;

use thiserror::Error;

use crate::handler::Handler;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("rpc: method already defined: {0}")]
    Duplicate(String),

    #[error("rpc: method name must not be empty")]
    InvalidName,
}

// name -> handler map, filled during setup and read-only while serving
#[derive(Default)]
pub struct Registry {
    methods: HashMap<String, Box<dyn Handler>>,
}

impl Registry {
    pub fn insert(&mut self, method: String, handler: Box<dyn Handler>) -> Result<(), RegisterError> {
        if method.is_empty() {
            return Err(RegisterError::InvalidName);
        }

        if self.methods.contains_key(&method) {
            return Err(RegisterError::Duplicate(method));
        }

        self.methods.insert(method, handler);
        Ok(())
    }

    pub fn get(&self, method: &str) -> Option<&dyn Handler> {
        self.methods.get(method).map(|h| h.as_ref())
    }

    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::{say_hello, FnHandler};

    use super::{RegisterError, Registry};

    #[test]
    fn test_insert_and_get() {
        let mut registry = Registry::default();
        registry
            .insert("API.SayHello".to_string(), Box::new(FnHandler::new(say_hello)))
            .unwrap();

        assert!(registry.get("API.SayHello").is_some());
        assert!(registry.get("API.SayGoodbye").is_none());
        assert_eq!(registry.methods(), vec!["API.SayHello"]);
    }

    #[test]
    fn test_reject_duplicate() {
        let mut registry = Registry::default();
        registry
            .insert("API.SayHello".to_string(), Box::new(FnHandler::new(say_hello)))
            .unwrap();

        assert_eq!(
            registry.insert("API.SayHello".to_string(), Box::new(FnHandler::new(say_hello))),
            Err(RegisterError::Duplicate("API.SayHello".to_string()))
        );
    }

    #[test]
    fn test_reject_empty_name() {
        let mut registry = Registry::default();

        assert_eq!(
            registry.insert(String::new(), Box::new(FnHandler::new(say_hello))),
            Err(RegisterError::InvalidName)
        );
    }
}
