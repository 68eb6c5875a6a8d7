//! Support for Qt Linguist `.ts` translation documents.
//!
//! The document is kept as the stream of XML events it was parsed from, with every
//! `<translation>` element grouped into one editable [`TranslationNode`]. Writing the
//! document back re-emits the untouched events verbatim, so attributes, comments,
//! locations and whitespace outside the edited translations survive unchanged.
//!
//! Output always starts with the framing Qt tools expect:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! ```

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::Parser, types::TranslationKey};

/// Written before the root element of every saved document.
pub const DOCUMENT_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

/// Value of the `type` attribute marking a translation as not yet done.
pub const UNFINISHED: &str = "unfinished";

/// A parsed `.ts` document.
#[derive(Debug, Clone)]
pub struct Format {
    nodes: Vec<Node>,
    language: Option<String>,
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone)]
enum Node {
    Event(Event<'static>),
    Translation(TranslationNode),
}

/// One `<message>` of the document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub key: TranslationKey,
    /// `numerus="yes"`: the translation holds `<numerusform>` children instead of text.
    pub numerus: bool,
    node: usize,
}

/// A `<translation>` element and everything inside it.
#[derive(Debug, Clone)]
pub struct TranslationNode {
    start: BytesStart<'static>,
    content: Vec<Event<'static>>,
    self_closing: bool,
}

impl TranslationNode {
    /// Direct text content, unescaped. Text inside nested elements is not included.
    pub fn text(&self) -> Result<String, Error> {
        let mut text = String::new();
        let mut depth = 0usize;
        for event in &self.content {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Text(t) if depth == 0 => text.push_str(&t.unescape()?),
                Event::CData(c) if depth == 0 => text.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        Ok(text)
    }

    pub fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        attribute(&self.start, name)
    }

    pub fn is_unfinished(&self) -> Result<bool, Error> {
        Ok(self.attribute("type")?.as_deref() == Some(UNFINISHED))
    }

    /// Replaces the direct text content. Nested elements are kept.
    fn set_text(&mut self, text: &str) -> Result<(), Error> {
        if self.text()? == text {
            return Ok(());
        }

        let mut depth = 0usize;
        self.content.retain(|event| match event {
            Event::Start(_) => {
                depth += 1;
                true
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                true
            }
            Event::Text(_) | Event::CData(_) => depth > 0,
            _ => true,
        });

        if !text.is_empty() {
            self.content
                .insert(0, Event::Text(BytesText::new(text).into_owned()));
            self.self_closing = false;
        }
        Ok(())
    }

    /// Sets `type="unfinished"`, or drops the `type` attribute entirely.
    ///
    /// The start tag is only rebuilt when the marker actually changes.
    fn set_unfinished(&mut self, unfinished: bool) -> Result<(), Error> {
        let current = self.attribute("type")?;
        let wanted = unfinished.then_some(UNFINISHED);
        if current.as_deref() == wanted {
            return Ok(());
        }

        let name = self.name();
        let mut rebuilt = BytesStart::new(name);
        let mut replaced = false;
        for attr in self.start.attributes().with_checks(false) {
            let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
            if attr.key.as_ref() == b"type" {
                if unfinished && !replaced {
                    rebuilt.push_attribute(("type", UNFINISHED));
                    replaced = true;
                }
                continue;
            }
            rebuilt.push_attribute(attr);
        }
        if unfinished && !replaced {
            rebuilt.push_attribute(("type", UNFINISHED));
        }

        let rebuilt = rebuilt.into_owned();
        self.start = rebuilt;
        Ok(())
    }

    fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        if self.self_closing && self.content.is_empty() {
            writer.write_event(Event::Empty(self.start.clone()))?;
            return Ok(());
        }
        writer.write_event(Event::Start(self.start.clone()))?;
        for event in &self.content {
            writer.write_event(event.clone())?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name())))?;
        Ok(())
    }
}

impl Format {
    /// The root `language` attribute, exactly as declared.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn translation(&self, message: &MessageRecord) -> Option<&TranslationNode> {
        match self.nodes.get(message.node) {
            Some(Node::Translation(node)) => Some(node),
            _ => None,
        }
    }

    /// Current text of the translation of message `index`.
    pub fn translation_text(&self, index: usize) -> Result<String, Error> {
        let message = self.message(index)?;
        self.translation(message)
            .ok_or_else(|| dangling(index))?
            .text()
    }

    /// Writes `text` into the translation of message `index`.
    ///
    /// Non-empty text clears the unfinished marker; empty text sets it and leaves
    /// the element without text content.
    pub fn set_translation(&mut self, index: usize, text: &str) -> Result<(), Error> {
        let node = self.message(index)?.node;
        let translation = match self.nodes.get_mut(node) {
            Some(Node::Translation(translation)) => translation,
            _ => return Err(dangling(index)),
        };
        translation.set_text(text)?;
        translation.set_unfinished(text.is_empty())
    }

    fn message(&self, index: usize) -> Result<&MessageRecord, Error> {
        self.messages
            .get(index)
            .ok_or_else(|| Error::DataMismatch(format!("no message at index {index}")))
    }
}

fn dangling(index: usize) -> Error {
    Error::DataMismatch(format!("message {index} has no translation node"))
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut nodes = Vec::new();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut language = None;
        let mut contexts: Vec<PendingContext> = Vec::new();
        let mut capture: Option<Capture> = None;

        loop {
            let event = xml_reader.read_event_into(&mut buf)?.into_owned();
            buf.clear();

            match event {
                Event::Eof => break,
                Event::Start(start) => {
                    let local = start.local_name().as_ref().to_vec();
                    let depth = stack.len();
                    match (depth, stack.last().map(Vec::as_slice), local.as_slice()) {
                        (0, _, _) => language = read_root(&start)?,
                        (1, _, b"context") => contexts.push(PendingContext::default()),
                        (2, Some(b"context"), b"name") => {
                            capture = Some(Capture::new(Field::Name, depth + 1))
                        }
                        (2, Some(b"context"), b"message") => {
                            current_context(&mut contexts)?
                                .messages
                                .push(PendingMessage::new(&start)?);
                        }
                        (3, Some(b"message"), b"source") => {
                            capture = Some(Capture::new(Field::Source, depth + 1))
                        }
                        (3, Some(b"message"), b"comment") => {
                            capture = Some(Capture::new(Field::Comment, depth + 1))
                        }
                        (3, Some(b"message"), b"translation") => {
                            let node = read_translation(&mut xml_reader, start)?;
                            current_message(&mut contexts)?.attach_translation(nodes.len())?;
                            nodes.push(Node::Translation(node));
                            continue;
                        }
                        _ => {}
                    }
                    stack.push(local);
                    nodes.push(Node::Event(Event::Start(start)));
                }
                Event::Empty(start) => {
                    let local = start.local_name().as_ref().to_vec();
                    let depth = stack.len();
                    match (depth, stack.last().map(Vec::as_slice), local.as_slice()) {
                        (0, _, _) => language = read_root(&start)?,
                        (1, _, b"context") => contexts.push(PendingContext::default()),
                        (2, Some(b"context"), b"name") => {
                            Capture::new(Field::Name, depth + 1).finish(&mut contexts)?
                        }
                        (2, Some(b"context"), b"message") => {
                            current_context(&mut contexts)?
                                .messages
                                .push(PendingMessage::new(&start)?);
                        }
                        (3, Some(b"message"), b"source") => {
                            Capture::new(Field::Source, depth + 1).finish(&mut contexts)?
                        }
                        (3, Some(b"message"), b"comment") => {
                            Capture::new(Field::Comment, depth + 1).finish(&mut contexts)?
                        }
                        (3, Some(b"message"), b"translation") => {
                            current_message(&mut contexts)?.attach_translation(nodes.len())?;
                            nodes.push(Node::Translation(TranslationNode {
                                start,
                                content: Vec::new(),
                                self_closing: true,
                            }));
                            continue;
                        }
                        _ => {}
                    }
                    nodes.push(Node::Event(Event::Empty(start)));
                }
                Event::End(end) => {
                    if capture.as_ref().is_some_and(|c| c.depth == stack.len()) {
                        if let Some(done) = capture.take() {
                            done.finish(&mut contexts)?;
                        }
                    }
                    stack.pop();
                    nodes.push(Node::Event(Event::End(end)));
                }
                Event::Text(text) => {
                    if let Some(c) = capture.as_mut() {
                        if c.depth == stack.len() {
                            c.text.push_str(&text.unescape()?);
                        }
                    }
                    nodes.push(Node::Event(Event::Text(text)));
                }
                Event::CData(data) => {
                    if let Some(c) = capture.as_mut() {
                        if c.depth == stack.len() {
                            c.text.push_str(&String::from_utf8_lossy(&data));
                        }
                    }
                    nodes.push(Node::Event(Event::CData(data)));
                }
                other => nodes.push(Node::Event(other)),
            }
        }

        let messages = collect_messages(contexts)?;
        Ok(Format {
            nodes,
            language,
            messages,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(DOCUMENT_HEADER.as_bytes())?;

        let mut xml_writer = Writer::new(&mut writer);
        let mut in_prolog = true;
        // Whitespace at the very start or right after a replaced declaration.
        let mut drop_text = true;
        for node in &self.nodes {
            match node {
                Node::Event(event) => {
                    if in_prolog {
                        match event {
                            // Replaced by DOCUMENT_HEADER.
                            Event::Decl(_) | Event::DocType(_) => {
                                drop_text = true;
                                continue;
                            }
                            Event::Text(_) if drop_text => continue,
                            Event::Start(_) | Event::Empty(_) => in_prolog = false,
                            _ => drop_text = false,
                        }
                    }
                    xml_writer.write_event(event.clone())?;
                }
                Node::Translation(translation) => translation.write(&mut xml_writer)?,
            }
        }

        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Source,
    Comment,
}

/// Text being collected for a `<name>`, `<source>` or `<comment>` element.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

impl Capture {
    fn new(field: Field, depth: usize) -> Self {
        Self {
            field,
            depth,
            text: String::new(),
        }
    }

    fn finish(self, contexts: &mut [PendingContext]) -> Result<(), Error> {
        let (slot, element) = match self.field {
            Field::Name => (&mut current_context(contexts)?.name, "name"),
            Field::Source => (&mut current_message(contexts)?.source, "source"),
            Field::Comment => (&mut current_message(contexts)?.comment, "comment"),
        };
        if slot.is_some() {
            return Err(Error::malformed(format!("duplicate <{element}> element")));
        }
        *slot = Some(self.text);
        Ok(())
    }
}

#[derive(Default)]
struct PendingContext {
    name: Option<String>,
    messages: Vec<PendingMessage>,
}

struct PendingMessage {
    source: Option<String>,
    comment: Option<String>,
    translation: Option<usize>,
    numerus: bool,
}

impl PendingMessage {
    fn new(start: &BytesStart<'_>) -> Result<Self, Error> {
        Ok(Self {
            source: None,
            comment: None,
            translation: None,
            numerus: attribute(start, "numerus")?.as_deref() == Some("yes"),
        })
    }

    fn attach_translation(&mut self, node: usize) -> Result<(), Error> {
        if self.translation.is_some() {
            return Err(Error::malformed("duplicate <translation> element"));
        }
        self.translation = Some(node);
        Ok(())
    }
}

fn current_context(contexts: &mut [PendingContext]) -> Result<&mut PendingContext, Error> {
    contexts
        .last_mut()
        .ok_or_else(|| Error::malformed("element outside of a <context>"))
}

fn current_message(contexts: &mut [PendingContext]) -> Result<&mut PendingMessage, Error> {
    current_context(contexts)?
        .messages
        .last_mut()
        .ok_or_else(|| Error::malformed("element outside of a <message>"))
}

fn read_root(start: &BytesStart<'_>) -> Result<Option<String>, Error> {
    if start.local_name().as_ref() != b"TS" {
        return Err(Error::malformed(format!(
            "root element is <{}>, expected <TS>",
            String::from_utf8_lossy(start.name().as_ref())
        )));
    }
    attribute(start, "language")
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, Error> {
    match start
        .try_get_attribute(name)
        .map_err(|e| Error::DataMismatch(e.to_string()))?
    {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Consumes events up to the `</translation>` matching `start`.
fn read_translation<R: BufRead>(
    xml_reader: &mut Reader<R>,
    start: BytesStart<'static>,
) -> Result<TranslationNode, Error> {
    let mut buf = Vec::new();
    let mut content = Vec::new();
    let mut depth = 0usize;
    loop {
        let event = xml_reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => {
                return Ok(TranslationNode {
                    start,
                    content,
                    self_closing: false,
                });
            }
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(Error::malformed("unterminated <translation> element")),
            _ => {}
        }
        content.push(event);
    }
}

fn collect_messages(contexts: Vec<PendingContext>) -> Result<Vec<MessageRecord>, Error> {
    let mut messages = Vec::new();
    for (context_index, context) in contexts.into_iter().enumerate() {
        let name = context.name.ok_or_else(|| {
            Error::malformed(format!("context #{} has no <name>", context_index + 1))
        })?;
        for (message_index, message) in context.messages.into_iter().enumerate() {
            let position = format!("context `{}` message #{}", name, message_index + 1);
            let source = message
                .source
                .ok_or_else(|| Error::malformed(format!("{position} has no <source>")))?;
            let node = message
                .translation
                .ok_or_else(|| Error::malformed(format!("{position} has no <translation>")))?;
            messages.push(MessageRecord {
                key: TranslationKey::new(name.clone(), source, message.comment.unwrap_or_default()),
                numerus: message.numerus,
                node,
            });
        }
    }
    Ok(messages)
}
