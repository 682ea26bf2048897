//! An incremental decoder for the server-sent-events line protocol.

/// One dispatched SSE message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    /// The `event:` field, absent for unnamed messages.
    pub event: Option<String>,
    /// The joined `data:` lines.
    pub data: String,
}

/// Feeds on raw body chunks and yields messages at blank-line boundaries.
///
/// Comment lines and unknown fields are ignored; a message without data
/// (the keep-alives some upstreams send) is dropped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> SseDecoder {
        SseDecoder::default()
    }

    /// Consume a body chunk, returning any messages it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut messages = Vec::new();

        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            self.process_line(line.trim_end_matches(['\n', '\r']), &mut messages);
        }

        messages
    }

    fn process_line(&mut self, line: &str, messages: &mut Vec<SseMessage>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                messages.push(SseMessage {
                    event: self.event.take(),
                    data: self.data.join("\n"),
                });
            }

            self.event = None;
            self.data.clear();
            return;
        }

        if line.starts_with(':') {
            return;
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);

        match field {
            "event" => self.event = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_single_event() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b"event: head\ndata: {\"slot\":\"1\"}\n\n");

        assert_eq!(
            messages,
            vec![SseMessage {
                event: Some("head".into()),
                data: "{\"slot\":\"1\"}".into(),
            }]
        );
    }

    #[test]
    fn reassembles_events_split_across_chunks() {
        let mut decoder = SseDecoder::new();

        assert!(decoder.feed(b"event: blo").is_empty());
        assert!(decoder.feed(b"ck\ndata: {\"slot\"").is_empty());
        let messages = decoder.feed(b":\"2\"}\n\n");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event.as_deref(), Some("block"));
        assert_eq!(messages[0].data, "{\"slot\":\"2\"}");
    }

    #[test]
    fn joins_multi_line_data() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b"data: one\ndata: two\n\n");

        assert_eq!(messages[0].data, "one\ntwo");
        assert!(messages[0].event.is_none());
    }

    #[test]
    fn skips_comments_and_keep_alives() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b": keep-alive\n\nevent: head\n\ndata: x\n\n");

        // The comment and the data-less "head" dispatch are dropped.
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].data, "x");
    }

    #[test]
    fn handles_crlf_lines() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b"event: head\r\ndata: y\r\n\r\n");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event.as_deref(), Some("head"));
        assert_eq!(messages[0].data, "y");
    }
}
