//! Minimal owned XML tree built on `quick-xml`.
//!
//! Elements live in a flat arena in document order, so neither building nor
//! dropping a deeply nested document recurses. Only the pieces the analyzer
//! needs are kept: local names, whether the element sits in a namespace, and
//! the element's own text.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text content outside the root element")]
    TextOutsideRoot,

    #[error("{0} element(s) left unclosed at end of document")]
    Unclosed(usize),

    #[error("undeclared namespace prefix '{0}'")]
    UnboundPrefix(String),
}

#[derive(Debug, Clone)]
pub struct XmlElement {
    /// Tag name with any namespace prefix removed, case preserved.
    pub local_name: String,
    /// True when the element resolves to a namespace URI (prefixed or default).
    pub namespaced: bool,
    /// Concatenated direct text and CDATA, whitespace-trimmed.
    pub text: String,
    children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    elements: Vec<XmlElement>,
}

impl XmlDocument {
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut elements: Vec<XmlElement> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut raw_text: Vec<String> = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            let (ns, event) = reader.read_resolved_event().map_err(|e| XmlError::Syntax {
                position,
                message: e.to_string(),
            })?;

            let namespaced = match ns {
                ResolveResult::Bound(_) => true,
                ResolveResult::Unbound => false,
                ResolveResult::Unknown(prefix) => {
                    return Err(XmlError::UnboundPrefix(
                        String::from_utf8_lossy(&prefix).into_owned(),
                    ));
                }
            };

            match event {
                Event::Start(e) => {
                    check_attributes(&e, position)?;
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    let idx = push_element(&mut elements, &mut raw_text, &open, local, namespaced)?;
                    open.push(idx);
                }
                Event::Empty(e) => {
                    check_attributes(&e, position)?;
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    push_element(&mut elements, &mut raw_text, &open, local, namespaced)?;
                }
                Event::End(_) => {
                    if open.pop().is_none() {
                        return Err(XmlError::Syntax {
                            position,
                            message: "unexpected closing tag".to_string(),
                        });
                    }
                }
                Event::Text(e) => {
                    let unescaped = e.unescape().map_err(|err| XmlError::Syntax {
                        position,
                        message: err.to_string(),
                    })?;
                    match open.last() {
                        Some(&idx) => raw_text[idx].push_str(&unescaped),
                        None if unescaped.trim().is_empty() => {}
                        None => return Err(XmlError::TextOutsideRoot),
                    }
                }
                Event::CData(e) => match open.last() {
                    Some(&idx) => raw_text[idx].push_str(&String::from_utf8_lossy(&e.into_inner())),
                    None => return Err(XmlError::TextOutsideRoot),
                },
                Event::Decl(_) if position != 0 => {
                    return Err(XmlError::Syntax {
                        position,
                        message: "XML declaration must be at the start of the document".to_string(),
                    });
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and DOCTYPE carry nothing we use.
                _ => {}
            }
        }

        if !open.is_empty() {
            return Err(XmlError::Unclosed(open.len()));
        }
        if elements.is_empty() {
            return Err(XmlError::NoRoot);
        }

        for (element, text) in elements.iter_mut().zip(raw_text) {
            element.text = text.trim().to_string();
        }

        Ok(Self { elements })
    }

    pub fn root(&self) -> &XmlElement {
        &self.elements[0]
    }

    pub fn root_tag(&self) -> &str {
        &self.root().local_name
    }

    /// Every element below the root, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &XmlElement> {
        self.elements.iter().skip(1)
    }

    pub fn children<'a>(&'a self, element: &'a XmlElement) -> impl Iterator<Item = &'a XmlElement> {
        element.children.iter().map(move |&idx| &self.elements[idx])
    }

    /// Depth-first walk from the root yielding `(element, depth)`, never going
    /// below `max_depth` (root is depth 0). Uses an explicit stack.
    pub fn walk(&self, max_depth: usize) -> Vec<(&XmlElement, usize)> {
        let mut visited = Vec::new();
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

        while let Some((idx, depth)) = stack.pop() {
            let element = &self.elements[idx];
            visited.push((element, depth));
            if depth < max_depth {
                for &child in element.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        visited
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Quoted values, no duplicate names.
fn check_attributes(start: &BytesStart<'_>, position: u64) -> Result<(), XmlError> {
    for attr in start.attributes().with_checks(true) {
        attr.map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;
    }
    Ok(())
}

fn push_element(
    elements: &mut Vec<XmlElement>,
    raw_text: &mut Vec<String>,
    open: &[usize],
    local_name: String,
    namespaced: bool,
) -> Result<usize, XmlError> {
    let parent = open.last().copied();
    if parent.is_none() && !elements.is_empty() {
        return Err(XmlError::MultipleRoots);
    }

    let idx = elements.len();
    elements.push(XmlElement {
        local_name,
        namespaced,
        text: String::new(),
        children: Vec::new(),
    });
    raw_text.push(String::new());

    if let Some(parent) = parent {
        elements[parent].children.push(idx);
    }
    Ok(idx)
}
