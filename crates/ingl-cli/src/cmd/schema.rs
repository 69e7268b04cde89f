use anyhow::Result;
use ingl_core::codec::schema::{self, PayloadSchema};
use ingl_core::version::PayloadVersion;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct FieldOut {
    pub name: &'static str,
    pub encoding: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SchemaOut {
    pub name: &'static str,
    pub version: &'static str,
    pub tag: Option<u8>,
    /// Set when every field is fixed-width.
    pub fixed_len: Option<usize>,
    pub fields: Vec<FieldOut>,
}

pub fn run(version: &str) -> Result<()> {
    let version = PayloadVersion::parse(version)?;
    let out: Vec<SchemaOut> = schema::schemas(version).iter().map(|s| describe(s)).collect();
    output::print(&out)
}

fn describe(s: &PayloadSchema) -> SchemaOut {
    SchemaOut {
        name: s.name,
        version: s.version.as_str(),
        tag: s.tag,
        fixed_len: s.fixed_len(),
        fields: s
            .fields
            .iter()
            .map(|f| FieldOut {
                name: f.name,
                encoding: f.kind.as_str(),
            })
            .collect(),
    }
}
