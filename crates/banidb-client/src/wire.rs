//! BaniDB v2 wire decoding
//!
//! The provider is inconsistent about nesting: bani verses arrive wrapped as
//! `{ verse: { verseId, verse: { unicode } } }` while shabad verses are flat,
//! and catalog ids show up as `id`, `baniID` or `ID`. Decoding walks
//! `serde_json::Value` instead of fixed structs so one odd record never
//! poisons a whole response.

use gurbani_types::{
    CatalogEntry, Composition, CompositionKind, CompositionRef, Verse, VerseCandidate,
};
use serde_json::Value;

/// Name used when the provider does not supply one
pub const DEFAULT_COMPOSITION_NAME: &str = "Gurbani";

/// Decode a search response body
///
/// A body without a `verses` array is an empty result; a body that is not a
/// JSON object at all is malformed.
pub fn parse_search(body: &Value) -> Result<Vec<VerseCandidate>, String> {
    if !body.is_object() {
        return Err(format!("expected object, got {}", kind_of(body)));
    }
    let Some(verses) = body.get("verses").and_then(Value::as_array) else {
        return Ok(vec![]);
    };
    Ok(verses.iter().filter_map(candidate_from_value).collect())
}

fn candidate_from_value(value: &Value) -> Option<VerseCandidate> {
    let verse_id = id_field(value, &["verseId"]).or_else(|| {
        value
            .get("verse")
            .and_then(|inner| id_field(inner, &["verseId"]))
    })?;
    let shabad_id = id_field(value, &["shabadId"])?;

    let gurmukhi = value
        .get("verse")
        .and_then(|v| str_field(v, &["unicode", "gurmukhi"]))
        .or_else(|| value.get("gurmukhi").and_then(|g| str_field(g, &["unicode"])))
        .or_else(|| str_field(value, &["gurmukhi"]))
        .unwrap_or_default();

    let transliteration = value
        .get("transliteration")
        .and_then(|t| str_field(t, &["english"]))
        .unwrap_or_default();

    Some(VerseCandidate {
        verse_id,
        shabad_id,
        gurmukhi,
        transliteration,
    })
}

/// Decode a bani or shabad body into a composition
///
/// Returns `None` when the body carries no `verses` array. Lines without
/// Gurmukhi text are dropped.
pub fn parse_composition(body: &Value, reference: CompositionRef) -> Option<Composition> {
    let verses = body.get("verses")?.as_array()?;

    let lines: Vec<Verse> = verses
        .iter()
        .filter_map(|v| verse_from_value(v, reference))
        .filter(|line| !line.gurmukhi.is_empty())
        .collect();

    Some(Composition {
        reference,
        name: composition_name(body, reference.kind),
        lines,
    })
}

fn verse_from_value(value: &Value, reference: CompositionRef) -> Option<Verse> {
    let core = match value.get("verse") {
        Some(inner) if inner.is_object() && inner.get("verseId").is_some() => inner,
        _ => value,
    };
    let text = match core.get("verse") {
        Some(inner) if inner.is_object() => inner,
        _ => core,
    };

    let id = id_field(core, &["verseId"])?;
    let gurmukhi = str_field(text, &["unicode", "gurmukhi"]).unwrap_or_default();

    let transliteration = core.get("transliteration");
    let translation = core.get("translation").and_then(|t| t.get("en"));

    let composition_id = id_field(core, &["shabadId"]).or(match reference.kind {
        CompositionKind::Shabad => Some(reference.id),
        CompositionKind::Bani => None,
    });

    Some(Verse {
        id,
        gurmukhi,
        transliteration: transliteration
            .and_then(|t| str_field(t, &["english"]))
            .unwrap_or_default(),
        transliteration_hi: transliteration
            .and_then(|t| str_field(t, &["hindi"]))
            .unwrap_or_default(),
        translation: translation
            .and_then(|t| str_field(t, &["bdb", "ms"]))
            .unwrap_or_default(),
        composition_id,
    })
}

fn composition_name(body: &Value, kind: CompositionKind) -> String {
    let name = match kind {
        CompositionKind::Shabad => body
            .get("shabadInfo")
            .and_then(|info| info.get("source"))
            .and_then(|source| str_field(source, &["english"])),
        CompositionKind::Bani => body
            .get("baniInfo")
            .and_then(|info| str_field(info, &["transliteration", "english", "gurmukhi"])),
    };
    name.unwrap_or_else(|| DEFAULT_COMPOSITION_NAME.to_string())
}

/// Decode the catalog body (bare array or `{ banis: [...] }`)
pub fn parse_catalog(body: &Value) -> Result<Vec<CatalogEntry>, String> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("banis").and_then(Value::as_array) {
            Some(items) => items,
            None => return Err("catalog object has no `banis` array".to_string()),
        },
        other => return Err(format!("expected array or object, got {}", kind_of(other))),
    };

    Ok(list
        .iter()
        .filter_map(|item| {
            let id = id_field(item, &["id", "baniID", "ID"])?;
            Some(CatalogEntry {
                id,
                name: str_field(item, &["name"]),
                gurmukhi: str_field(item, &["gurmukhi", "unicode"]),
                transliteration: str_field(item, &["transliteration"]),
                english: str_field(item, &["english"]),
            })
        })
        .collect())
}

/// First non-empty string among `keys`
fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First id among `keys`, accepting numbers and numeric strings
fn id_field(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
