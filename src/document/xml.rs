// File: src/document/xml.rs
//! Flat XML documents: one root element whose children are the records.
//! This is the shape of both the mapping and the lexicon files.

use crate::core::engine::PronunciationRecord;
use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;
use tracing::debug;

/// One element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlRecord {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
}

impl XmlRecord {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing attribute in place, or appends a new one.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut record = Self::new(&name);
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            record.attributes.push((key, value));
        }
        Ok(record)
    }

    fn to_start(&self) -> BytesStart<'_> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        start
    }
}

impl PronunciationRecord for XmlRecord {
    fn ipa(&self) -> Option<&str> {
        self.get("ipa")
    }

    fn set_field(&mut self, key: &str, value: &str) {
        self.set(key, value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlRecord,
    pub records: Vec<XmlRecord>,
}

impl XmlDocument {
    /// Parses the root element and its direct children.
    /// Comments, processing instructions and anything nested deeper are dropped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut root: Option<XmlRecord> = None;
        let mut records = Vec::new();
        let mut current: Option<XmlRecord> = None;
        let mut depth = 0usize;
        let mut root_closed = false;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .with_context(|| format!("malformed XML near byte {}", position))?;
            match event {
                Event::Start(_) | Event::Empty(_) if depth == 0 && root_closed => {
                    bail!("malformed XML: extra content after the root element");
                }
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        1 => root = Some(XmlRecord::from_start(&e)?),
                        2 => current = Some(XmlRecord::from_start(&e)?),
                        _ => debug!(depth, "dropping nested element"),
                    }
                }
                Event::Empty(e) => match depth {
                    0 => {
                        root = Some(XmlRecord::from_start(&e)?);
                        root_closed = true;
                    }
                    1 => records.push(XmlRecord::from_start(&e)?),
                    _ => debug!(depth, "dropping nested element"),
                },
                Event::Text(t) if depth == 0 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        bail!("malformed XML: text outside the root element");
                    }
                }
                Event::Text(t) if depth == 2 => {
                    if let Some(record) = current.as_mut() {
                        record.text = Some(t.unescape()?.into_owned());
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        root_closed = true;
                    }
                }
                Event::Eof => break,
                _ => (),
            }
        }

        if depth != 0 {
            bail!("malformed XML: document ends inside an open element");
        }
        let root = root.ok_or_else(|| anyhow!("XML document has no root element"))?;
        Ok(Self { root, records })
    }

    pub fn write_to<W: Write>(&self, inner: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let root = self.root.to_start();
        if self.records.is_empty() {
            writer.write_event(Event::Empty(root))?;
        } else {
            let end = root.to_end().into_owned();
            writer.write_event(Event::Start(root))?;
            for record in &self.records {
                let start = record.to_start();
                match &record.text {
                    Some(text) => {
                        let end = start.to_end().into_owned();
                        writer.write_event(Event::Start(start))?;
                        writer.write_event(Event::Text(BytesText::new(text)))?;
                        writer.write_event(Event::End(end))?;
                    }
                    None => writer.write_event(Event::Empty(start))?,
                }
            }
            writer.write_event(Event::End(end))?;
        }

        writer.into_inner().write_all(b"\n")?;
        Ok(())
    }
}
