//! Bulletin XML parsing.
//!
//! A decompressed bulletin nests components three levels deep:
//!
//! ```text
//! <metadataResponse>
//!   <bulletin>
//!     <componentList>
//!       <component>
//!         <componentID>vmware-workstation</componentID>
//!         <payload>VMware-workstation-full-17.6.3-24583834.exe</payload>
//!         <relativePath>VMware-workstation-17.6.3-24583834.x86_64.exe.tar</relativePath>
//!         <checksum>
//!           <checksumType>sha256</checksumType>
//!           <checksum>8a1c...</checksum>
//!         </checksum>
//!       </component>
//!     </componentList>
//!   </bulletin>
//! </metadataResponse>
//! ```
//!
//! Components outside a `bulletin`/`componentList` pair are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::item::{Checksum, DownloadableItem};
use super::node::{first_non_empty, TextNode};
use crate::error::{CatalogError, CatalogResult};

/// Component fields the parser collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    RelativePath,
    Payload,
    ComponentId,
    ChecksumType,
    ChecksumValue,
}

impl Field {
    fn classify(name: &str, in_checksum: bool) -> Option<Self> {
        match (name, in_checksum) {
            ("relativePath", false) => Some(Self::RelativePath),
            ("payload", false) => Some(Self::Payload),
            ("componentID", false) => Some(Self::ComponentId),
            ("checksumType", true) => Some(Self::ChecksumType),
            ("checksum", true) => Some(Self::ChecksumValue),
            _ => None,
        }
    }
}

/// Element whose text is being collected.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
    attributes: Vec<(String, String)>,
}

/// Fields of the component currently open. First occurrence of a field wins.
#[derive(Default)]
struct ComponentFields {
    depth: usize,
    checksum_depth: Option<usize>,
    relative_path: Option<TextNode>,
    payload: Option<TextNode>,
    component_id: Option<TextNode>,
    checksum_type: Option<TextNode>,
    checksum_value: Option<TextNode>,
}

impl ComponentFields {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    fn set(&mut self, field: Field, node: TextNode) {
        let slot = match field {
            Field::RelativePath => &mut self.relative_path,
            Field::Payload => &mut self.payload,
            Field::ComponentId => &mut self.component_id,
            Field::ChecksumType => &mut self.checksum_type,
            Field::ChecksumValue => &mut self.checksum_value,
        };
        if slot.is_none() {
            *slot = Some(node);
        }
    }

    /// Build the item, or `None` when no file path was declared.
    fn into_item(self, directory_fragment: &str) -> Option<DownloadableItem> {
        let file_name = first_non_empty(&[self.relative_path.as_ref().map(TextNode::text)])?;
        let name = resolve_name(
            self.payload.as_ref().map(TextNode::text),
            self.component_id.as_ref().map(TextNode::text),
            Some(file_name),
        )?;

        let checksum = match (
            first_non_empty(&[self.checksum_type.as_ref().map(TextNode::text)]),
            first_non_empty(&[self.checksum_value.as_ref().map(TextNode::text)]),
        ) {
            (Some(checksum_type), Some(value)) => Some(Checksum {
                checksum_type: checksum_type.to_string(),
                value: value.to_string(),
            }),
            _ => None,
        };

        Some(DownloadableItem {
            name: name.to_string(),
            directory_fragment: directory_fragment.to_string(),
            file_name: file_name.to_string(),
            checksum,
        })
    }
}

/// Display name: payload, then component id, then file path.
pub fn resolve_name<'a>(
    payload: Option<&'a str>,
    component_id: Option<&'a str>,
    relative_path: Option<&'a str>,
) -> Option<&'a str> {
    first_non_empty(&[payload, component_id, relative_path])
}

/// Parse a decompressed bulletin into downloadable items.
///
/// Every item gets `directory_fragment` as its directory. Components without a
/// `relativePath` are dropped.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedBulletin`] if the document is not
/// well-formed XML. A document without components yields an empty list.
pub fn parse_bulletin(xml: &str, directory_fragment: &str) -> CatalogResult<Vec<DownloadableItem>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut component: Option<ComponentFields> = None;
    let mut capture: Option<Capture> = None;
    let mut items = Vec::new();
    let mut dropped = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            CatalogError::MalformedBulletin(format!(
                "{} at byte {}",
                e,
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = element_name(&e);
                let depth = stack.len() + 1;

                match component.as_mut() {
                    None if name == "component" && within_component_list(&stack) => {
                        component = Some(ComponentFields::new(depth));
                    }
                    Some(fields) if capture.is_none() => {
                        if let Some(field) = Field::classify(&name, fields.checksum_depth.is_some()) {
                            capture = Some(Capture {
                                field,
                                depth,
                                text: String::new(),
                                attributes: attributes(&e)?,
                            });
                        } else if name == "checksum" && fields.checksum_depth.is_none() {
                            fields.checksum_depth = Some(depth);
                        }
                    }
                    _ => {}
                }

                stack.push(name);
            }
            Event::Empty(e) => {
                if component.is_none()
                    && element_name(&e) == "component"
                    && within_component_list(&stack)
                {
                    dropped += 1;
                }
            }
            Event::Text(e) => {
                if let Some(c) = capture.as_mut().filter(|c| c.depth == stack.len()) {
                    let text = e
                        .unescape()
                        .map_err(|e| CatalogError::MalformedBulletin(e.to_string()))?;
                    c.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(c) = capture.as_mut().filter(|c| c.depth == stack.len()) {
                    c.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let depth = stack.len();
                if stack.pop().is_none() {
                    return Err(CatalogError::MalformedBulletin(
                        "closing tag without matching opening tag".to_string(),
                    ));
                }

                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let (Some(c), Some(fields)) = (capture.take(), component.as_mut()) {
                        fields.set(c.field, TextNode::new(c.text.trim(), c.attributes));
                    }
                } else if let Some(fields) = component.as_mut() {
                    if fields.checksum_depth == Some(depth) {
                        fields.checksum_depth = None;
                    } else if fields.depth == depth {
                        if let Some(fields) = component.take() {
                            match fields.into_item(directory_fragment) {
                                Some(item) => items.push(item),
                                None => dropped += 1,
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CatalogError::MalformedBulletin(format!(
            "document ended inside <{}>",
            open
        )));
    }

    debug!(
        directory = directory_fragment,
        items = items.len(),
        dropped,
        "Parsed bulletin"
    );

    Ok(items)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> CatalogResult<Vec<(String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| CatalogError::MalformedBulletin(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| CatalogError::MalformedBulletin(e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn within_component_list(stack: &[String]) -> bool {
    match stack.iter().rposition(|name| name == "componentList") {
        Some(idx) => stack[..idx].iter().any(|name| name == "bulletin"),
        None => false,
    }
}
