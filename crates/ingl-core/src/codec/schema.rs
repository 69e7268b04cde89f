//! Versioned wire schemas for the payloads exchanged with the Ingl program.
//!
//! A schema is an ordered list of `(field name, encoding rule)`. The layout is
//! Borsh-compatible: little-endian fixed-width integers, `bool` as one byte,
//! strings and sequences prefixed with a u32 LE element count. Instruction
//! payloads start with a one-byte variant tag.
//!
//! `PayloadWriter` and `PayloadReader` walk a schema field by field and refuse
//! any access that does not match the next declared field. The schema tables
//! are therefore the only place where field order is decided.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::errors::{OnboardError, OnboardResult};
use crate::version::PayloadVersion;

/// Encoding rule for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    Bool,
    /// u32 LE byte length + UTF-8 bytes.
    String,
    /// u32 LE count + one byte per element.
    VecU8,
    /// u32 LE count + each element as `String`.
    VecString,
}

impl FieldKind {
    /// Width in bytes for fixed-width kinds.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::U8 | Self::Bool => Some(1),
            Self::U16 => Some(2),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::String | Self::VecU8 | Self::VecString => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16le",
            Self::U32 => "u32le",
            Self::U64 => "u64le",
            Self::Bool => "bool",
            Self::String => "string",
            Self::VecU8 => "vec<u8>",
            Self::VecString => "vec<string>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSchema {
    pub name: &'static str,
    pub version: PayloadVersion,
    /// Leading variant byte for instruction payloads; `None` for account data.
    pub tag: Option<u8>,
    pub fields: &'static [FieldSpec],
}

impl PayloadSchema {
    /// Total byte length when every field is fixed-width (tag included).
    pub fn fixed_len(&self) -> Option<usize> {
        let mut total = usize::from(self.tag.is_some());
        for f in self.fields {
            total += f.kind.fixed_width()?;
        }
        Some(total)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

/// Variant tag of the program's `Init` instruction.
pub const INIT_TAG: u8 = 0;

/// Variant tag of the program's `UploadUris` instruction.
pub const UPLOAD_URIS_TAG: u8 = 1;

pub const INIT_V1: PayloadSchema = PayloadSchema {
    name: "init",
    version: PayloadVersion::V1,
    tag: Some(INIT_TAG),
    fields: &[
        field("log_level", FieldKind::U8),
        field("init_commission", FieldKind::U8),
        field("max_primary_stake", FieldKind::U64),
        field("nft_holders_share", FieldKind::U8),
        field("initial_redemption_fee", FieldKind::U8),
        field("is_validator_id_switchable", FieldKind::Bool),
        field("unit_backing", FieldKind::U64),
        field("redemption_fee_duration", FieldKind::U32),
        field("proposal_quorum", FieldKind::U8),
        field("creator_royalties", FieldKind::U16),
        field("rarities", FieldKind::VecU8),
        field("rarity_names", FieldKind::VecString),
        field("twitter_handle", FieldKind::String),
        field("discord_invite", FieldKind::String),
        field("validator_name", FieldKind::String),
        field("collection_uri", FieldKind::String),
        field("website", FieldKind::String),
        field("governance_expiration_time", FieldKind::U32),
        field("default_uri", FieldKind::String),
    ],
};

pub const UPLOAD_URIS_V1: PayloadSchema = PayloadSchema {
    name: "upload_uris",
    version: PayloadVersion::V1,
    tag: Some(UPLOAD_URIS_TAG),
    fields: &[
        field("uris", FieldKind::VecString),
        field("rarity", FieldKind::U8),
        field("log_level", FieldKind::U8),
    ],
};

/// Configuration account of the external registry program.
pub const REGISTRY_CONFIG_V1: PayloadSchema = PayloadSchema {
    name: "registry_config",
    version: PayloadVersion::V1,
    tag: None,
    fields: &[
        field("validation_phrase", FieldKind::U32),
        field("validation_number", FieldKind::U32),
    ],
};

static SCHEMAS_V1: [&PayloadSchema; 3] = [&INIT_V1, &UPLOAD_URIS_V1, &REGISTRY_CONFIG_V1];

/// Every payload schema defined for `version`.
pub fn schemas(version: PayloadVersion) -> &'static [&'static PayloadSchema] {
    match version {
        PayloadVersion::V1 => &SCHEMAS_V1,
    }
}

/// Schema-checked payload encoder.
pub struct PayloadWriter {
    schema: &'static PayloadSchema,
    next: usize,
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new(schema: &'static PayloadSchema) -> Self {
        let mut buf = Vec::with_capacity(schema.fixed_len().unwrap_or(64));
        if let Some(tag) = schema.tag {
            buf.push(tag);
        }
        Self { schema, next: 0, buf }
    }

    pub fn u8(self, name: &str, v: u8) -> OnboardResult<Self> {
        self.put(name, FieldKind::U8, &v)
    }

    pub fn u16(self, name: &str, v: u16) -> OnboardResult<Self> {
        self.put(name, FieldKind::U16, &v)
    }

    pub fn u32(self, name: &str, v: u32) -> OnboardResult<Self> {
        self.put(name, FieldKind::U32, &v)
    }

    pub fn u64(self, name: &str, v: u64) -> OnboardResult<Self> {
        self.put(name, FieldKind::U64, &v)
    }

    pub fn bool(self, name: &str, v: bool) -> OnboardResult<Self> {
        self.put(name, FieldKind::Bool, &v)
    }

    pub fn string(self, name: &str, v: &str) -> OnboardResult<Self> {
        self.put(name, FieldKind::String, &v.to_string())
    }

    pub fn bytes(self, name: &str, v: &[u8]) -> OnboardResult<Self> {
        self.put(name, FieldKind::VecU8, &v.to_vec())
    }

    pub fn strings(self, name: &str, v: &[String]) -> OnboardResult<Self> {
        self.put(name, FieldKind::VecString, &v.to_vec())
    }

    /// Return the encoded bytes. Fails if any declared field was not written.
    pub fn finish(self) -> OnboardResult<Vec<u8>> {
        if self.next != self.schema.fields.len() {
            return Err(OnboardError::invalid_argument(format!(
                "{} {}: {} of {} fields written",
                self.schema.name,
                self.schema.version.as_str(),
                self.next,
                self.schema.fields.len()
            )));
        }
        Ok(self.buf)
    }

    fn put<T: BorshSerialize>(mut self, name: &str, kind: FieldKind, v: &T) -> OnboardResult<Self> {
        expect_field(self.schema, self.next, name, kind)?;
        v.serialize(&mut self.buf)
            .map_err(|e| OnboardError::invalid_argument(format!("encode {name}: {e}")))?;
        self.next += 1;
        Ok(self)
    }
}

/// Schema-checked decoder for fixed-layout account data.
pub struct PayloadReader<'a> {
    schema: &'static PayloadSchema,
    next: usize,
    data: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(schema: &'static PayloadSchema, data: &'a [u8]) -> OnboardResult<Self> {
        let mut data = data;
        if let Some(tag) = schema.tag {
            match data.split_first() {
                Some((&t, rest)) if t == tag => data = rest,
                Some((&t, _)) => {
                    return Err(OnboardError::malformed_account(format!(
                        "{}: unexpected tag {t}, expected {tag}",
                        schema.name
                    )))
                }
                None => return Err(OnboardError::malformed_account(format!("{}: empty data", schema.name))),
            }
        }
        Ok(Self { schema, next: 0, data })
    }

    pub fn u8(&mut self, name: &str) -> OnboardResult<u8> {
        self.take(name, FieldKind::U8)
    }

    pub fn u32(&mut self, name: &str) -> OnboardResult<u32> {
        self.take(name, FieldKind::U32)
    }

    pub fn u64(&mut self, name: &str) -> OnboardResult<u64> {
        self.take(name, FieldKind::U64)
    }

    /// Fails unless every field was read and no bytes remain.
    pub fn finish(self) -> OnboardResult<()> {
        if self.next != self.schema.fields.len() {
            return Err(OnboardError::invalid_argument(format!(
                "{}: {} of {} fields read",
                self.schema.name,
                self.next,
                self.schema.fields.len()
            )));
        }
        if !self.data.is_empty() {
            return Err(OnboardError::malformed_account(format!(
                "{}: {} trailing byte(s)",
                self.schema.name,
                self.data.len()
            )));
        }
        Ok(())
    }

    fn take<T: BorshDeserialize>(&mut self, name: &str, kind: FieldKind) -> OnboardResult<T> {
        expect_field(self.schema, self.next, name, kind)?;
        let v = T::deserialize(&mut self.data).map_err(|e| {
            OnboardError::malformed_account(format!("{}.{name}: {e}", self.schema.name))
        })?;
        self.next += 1;
        Ok(v)
    }
}

fn expect_field(schema: &PayloadSchema, index: usize, name: &str, kind: FieldKind) -> OnboardResult<()> {
    match schema.fields.get(index) {
        Some(f) if f.name == name && f.kind == kind => Ok(()),
        Some(f) => Err(OnboardError::invalid_argument(format!(
            "{} field #{index}: expected {} ({}), got {name} ({})",
            schema.name,
            f.name,
            f.kind.as_str(),
            kind.as_str()
        ))),
        None => Err(OnboardError::invalid_argument(format!(
            "{}: no field #{index} ({name})",
            schema.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TINY: PayloadSchema = PayloadSchema {
        name: "tiny",
        version: PayloadVersion::V1,
        tag: Some(9),
        fields: &[field("a", FieldKind::U16), field("b", FieldKind::String)],
    };

    #[test]
    fn v1_lists_all_payloads() {
        let names: Vec<_> = schemas(PayloadVersion::V1).iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["init", "upload_uris", "registry_config"]);
        assert_eq!(REGISTRY_CONFIG_V1.fixed_len(), Some(8));
    }

    #[test]
    fn writer_follows_schema() {
        let bytes = PayloadWriter::new(&TINY)
            .u16("a", 0x0102)
            .and_then(|w| w.string("b", "hi"))
            .and_then(|w| w.finish())
            .unwrap();
        assert_eq!(bytes, vec![9, 0x02, 0x01, 2, 0, 0, 0, b'h', b'i']);
    }

    #[test]
    fn out_of_order_write_rejected() {
        let err = PayloadWriter::new(&TINY).string("b", "x").err().unwrap();
        assert!(err.to_string().contains("expected a"));
    }

    #[test]
    fn incomplete_write_rejected() {
        let w = PayloadWriter::new(&TINY).u16("a", 1).unwrap();
        assert!(w.finish().is_err());
    }

    #[test]
    fn fixed_len_only_for_fixed_schemas() {
        assert_eq!(REGISTRY_CONFIG_V1.fixed_len(), Some(8));
        assert_eq!(INIT_V1.fixed_len(), None);
        assert_eq!(UPLOAD_URIS_V1.fixed_len(), None);
    }

    #[test]
    fn field_names_are_unique_per_schema() {
        for schema in [&INIT_V1, &UPLOAD_URIS_V1, &REGISTRY_CONFIG_V1] {
            let mut names = schema.field_names();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), schema.fields.len(), "{}", schema.name);
        }
    }
}
