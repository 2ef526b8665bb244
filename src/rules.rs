//! Parsing of `cors` directives into path-scoped rules.

use crate::cors::CorsOptions;
use crate::dispenser::Dispenser;
use crate::error::{AppError, AppResult, SyntaxError};
use serde::Serialize;
use std::path::Path;

/// Directive name handled by this parser
pub const DIRECTIVE: &str = "cors";

/// CORS options scoped to a URL path prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsRule {
    pub path: String,
    pub options: CorsOptions,
}

impl Default for CorsRule {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            options: CorsOptions::default(),
        }
    }
}

/// Parse every `cors` directive from `d`, in order.
///
/// Stops at the first error.
pub fn parse_rules(d: &mut Dispenser) -> Result<Vec<CorsRule>, SyntaxError> {
    let mut rules = Vec::new();

    while d.next() {
        let mut rule = CorsRule::default();
        let args = d.remaining_args();

        // Positional origins count as explicitly set, so `origin` appends
        let mut origins_set = false;
        match args.as_slice() {
            [] => {}
            [path] => rule.path = path.clone(),
            [origins, path] => {
                rule.options.allowed_origins = origins.split(',').map(str::to_string).collect();
                rule.path = path.clone();
                origins_set = true;
            }
            _ => return Err(d.err(format!("too many arguments: {}", args.join(" ")))),
        }

        while d.next_block() {
            parse_option(d, &mut rule.options, &mut origins_set)?;
        }

        tracing::debug!(path = %rule.path, origins = ?rule.options.allowed_origins, "Parsed CORS rule");
        rules.push(rule);
    }

    Ok(rules)
}

fn parse_option(
    d: &mut Dispenser,
    options: &mut CorsOptions,
    origins_set: &mut bool,
) -> Result<(), SyntaxError> {
    let item = d.val().to_string();
    match item.as_str() {
        "origin" => {
            if !*origins_set {
                options.allowed_origins.clear();
            }
            options.allowed_origins.extend(d.remaining_args());
            *origins_set = true;
        }
        "methods" => options.allowed_methods = single_arg(d, "methods")?,
        "allow_credentials" => {
            let arg = single_arg(d, "allow_credentials")?;
            options.allow_credentials = match arg.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => return Err(d.err("allow_credentials must be true or false")),
            };
        }
        "max_age" => {
            let arg = single_arg(d, "max_age")?;
            options.max_age = arg
                .parse()
                .map_err(|_| d.err("max_age must be a valid integer"))?;
        }
        "allowed_headers" => options.allowed_headers = single_arg(d, "allowed_headers")?,
        "exposed_headers" => options.exposed_headers = single_arg(d, "exposed_headers")?,
        _ => return Err(d.err(format!("unknown cors config item: {}", item))),
    }
    Ok(())
}

fn single_arg(d: &mut Dispenser, directive: &str) -> Result<String, SyntaxError> {
    let mut args = d.remaining_args();
    if args.len() != 1 {
        return Err(d.err(format!("{} expects exactly one argument", directive)));
    }
    Ok(args.remove(0))
}

/// Parse CORS rules from in-memory configuration text
pub fn parse_str(file: &str, input: &str) -> Result<Vec<CorsRule>, SyntaxError> {
    let mut d = Dispenser::for_directive(file, input, DIRECTIVE)?;
    parse_rules(&mut d)
}

/// Load CORS rules from a configuration file
pub fn load_rules(path: &Path) -> AppResult<Vec<CorsRule>> {
    let input = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_str(&path.display().to_string(), &input)?;

    tracing::info!(path = %path.display(), count = rules.len(), "Loaded CORS rules");
    Ok(rules)
}
