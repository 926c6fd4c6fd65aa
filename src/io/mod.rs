//! File I/O for expressions and scene settings
//!
//! Everything serializable in the crate is stored as JSON; expression files
//! use the `.json` extension.

mod json;

pub use json::{from_json_string, load_json, save_json, to_json_string};

use crate::expr::Expr;
use std::path::Path;
use thiserror::Error;

/// File I/O errors
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn check_extension(path: &Path) -> Result<(), IoError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(()),
        _ => Err(IoError::InvalidFormat(format!(
            "{}: expected a .json file",
            path.display()
        ))),
    }
}

/// Save an expression to a `.json` file
pub fn save(expr: &Expr, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    check_extension(path)?;
    save_json(expr, path)
}

/// Load an expression from a `.json` file
pub fn load(path: impl AsRef<Path>) -> Result<Expr, IoError> {
    let path = path.as_ref();
    check_extension(path)?;
    load_json(path)
}

/// Summary of an expression file
pub fn get_info(path: impl AsRef<Path>) -> Result<String, IoError> {
    let expr = load(path)?;
    let vars: Vec<String> = expr.variables().into_iter().collect();
    Ok(format!(
        "Formula: {}\nVariables: {}\nNode count: {}",
        expr,
        vars.join(", "),
        expr.node_count()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("implicit_trace_test_{}", name));
        path
    }

    #[test]
    fn test_save_load() {
        let e = Expr::var("x") * "y" - 1u32;
        let path = temp_path("saddle.json");
        save(&e, &path).unwrap();
        assert_eq!(load(&path).unwrap(), e);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_get_info() {
        let e = Expr::var("x").pow(2u32) + Expr::var("z");
        let path = temp_path("info.json");
        save(&e, &path).unwrap();
        let info = get_info(&path).unwrap();
        assert!(info.contains("Formula: x^2 + z"));
        assert!(info.contains("Variables: x, z"));
        assert!(info.contains("Node count: 5"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unknown_extension() {
        let e = Expr::var("x");
        assert!(matches!(
            save(&e, temp_path("expr.txt")),
            Err(IoError::InvalidFormat(_))
        ));
    }
}
