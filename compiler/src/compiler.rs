//! Main compiler implementation.

use crate::{ClassDescriptor, CompileError, CompileResult, PropertyDescriptor, Schema, Usage};
use ontic_core::DEFAULT_KEY_ORDER;
use regex_lite::Regex;
use std::path::Path;
use tracing::debug;

/// Valid short names for classes and properties.
const NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

const CLASS_ROW: &str = "class";
const PROPERTY_ROW: &str = "property";

/// A schema row with its 1-based line number.
struct Row<'a> {
    line: usize,
    cells: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn cell(&self, index: usize) -> &'a str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }
}

/// The Compiler transforms tab-separated schema text into a [`Schema`].
pub struct Compiler {
    name_pattern: Regex,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> CompileResult<Self> {
        let name_pattern =
            Regex::new(NAME_PATTERN).map_err(|e| CompileError::Pattern(e.to_string()))?;
        Ok(Self { name_pattern })
    }

    /// Compile schema text.
    pub fn compile(&self, source: &str) -> CompileResult<Schema> {
        let mut class_rows = Vec::new();
        let mut property_rows = Vec::new();

        // First pass: split rows by kind so classes exist before properties
        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let row = Row {
                line,
                cells: text.split('\t').collect(),
            };
            match row.cell(1) {
                CLASS_ROW => class_rows.push(row),
                PROPERTY_ROW => property_rows.push(row),
                other => {
                    return Err(CompileError::UnknownRowKind(other.to_string()).at_line(line))
                }
            }
        }

        // Second pass: classes, then properties filed under their domains
        let mut schema = Schema::new();
        for row in &class_rows {
            let class = self.class_row(row).map_err(|e| e.at_line(row.line))?;
            schema.add_class(class).map_err(|e| e.at_line(row.line))?;
        }
        for row in &property_rows {
            let property = self.property_row(row).map_err(|e| e.at_line(row.line))?;
            schema
                .add_property(property)
                .map_err(|e| e.at_line(row.line))?;
        }

        debug!(
            classes = class_rows.len(),
            properties = property_rows.len(),
            "compiled schema"
        );
        Ok(schema)
    }

    /// Read and compile a schema file.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> CompileResult<Schema> {
        let source = std::fs::read_to_string(path)?;
        self.compile(&source)
    }

    fn class_row(&self, row: &Row<'_>) -> CompileResult<ClassDescriptor> {
        if row.cells.len() < 3 {
            return Err(CompileError::malformed("class rows need at least id, kind and name"));
        }
        let mut class = ClassDescriptor::new(row.cell(0), self.short_name(row.cell(2))?)
            .with_label(row.cell(3))
            .with_description(unescape(row.cell(4)))
            .with_usage(Usage::parse(row.cell(6))?);
        class.parents = row
            .cell(5)
            .split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Ok(class)
    }

    fn property_row(&self, row: &Row<'_>) -> CompileResult<PropertyDescriptor> {
        if row.cells.len() < 7 {
            return Err(CompileError::malformed(
                "property rows need at least id, kind, name, label, description, super property and domain",
            ));
        }
        let mut property = PropertyDescriptor::new(
            row.cell(0),
            self.short_name(row.cell(2))?,
            row.cell(6),
            row.cell(7),
        )
        .with_label(row.cell(3))
        .with_order(parse_order(row.cell(9))?)
        .with_usage(Usage::parse(row.cell(10))?);
        property.description = unescape(row.cell(4));
        property.super_property = non_empty(row.cell(5));
        property.inverse = non_empty(row.cell(8));
        property.multiple = parse_multiple(row.cell(11))?;
        Ok(property)
    }

    fn short_name(&self, name: &str) -> CompileResult<String> {
        if self.name_pattern.is_match(name) {
            Ok(name.to_string())
        } else {
            Err(CompileError::InvalidName(name.to_string()))
        }
    }
}

/// Compile schema text with a default compiler.
pub fn compile(source: &str) -> CompileResult<Schema> {
    Compiler::new()?.compile(source)
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

fn unescape(cell: &str) -> String {
    cell.replace("\\n", "\n")
}

fn parse_order(cell: &str) -> CompileResult<u32> {
    if cell.is_empty() {
        return Ok(DEFAULT_KEY_ORDER);
    }
    cell.parse()
        .map_err(|_| CompileError::invalid_flag("order", cell))
}

fn parse_multiple(cell: &str) -> CompileResult<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "" | "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(CompileError::invalid_flag("multiple", cell)),
    }
}
