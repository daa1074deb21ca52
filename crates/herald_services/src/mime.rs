use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use herald_domain::OutgoingMessage;

const LINE_WIDTH: usize = 76;
/// Largest UTF-8 chunk whose base64 form fits one RFC 2047 encoded word.
const ENCODED_WORD_BYTES: usize = 45;

/// Serializes a message as `multipart/alternative` with a plain-text part
/// followed by an HTML part, both UTF-8 and base64 encoded.
pub fn encode(message: &OutgoingMessage, boundary: &str) -> Vec<u8> {
    let mut out = String::new();

    push_header(&mut out, "From", &single_line(message.sender()));
    push_header(&mut out, "To", &single_line(message.recipient()));
    push_header(&mut out, "Subject", &encode_subject(message.subject()));
    push_header(&mut out, "MIME-Version", "1.0");
    push_header(
        &mut out,
        "Content-Type",
        &format!("multipart/alternative; boundary=\"{boundary}\""),
    );
    out.push_str("\r\n");

    push_part(&mut out, boundary, "text/plain", message.plain_body());
    push_part(&mut out, boundary, "text/html", message.html_body());

    out.push_str("--");
    out.push_str(boundary);
    out.push_str("--\r\n");

    out.into_bytes()
}

/// Random boundary that cannot appear in base64 encoded content.
pub fn boundary() -> String {
    format!("=_herald_{}", uuid::Uuid::new_v4().simple())
}

fn push_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

fn push_part(out: &mut String, boundary: &str, content_type: &str, body: &str) {
    out.push_str("--");
    out.push_str(boundary);
    out.push_str("\r\n");
    push_header(out, "Content-Type", &format!("{content_type}; charset=\"utf-8\""));
    push_header(out, "Content-Transfer-Encoding", "base64");
    out.push_str("\r\n");

    let encoded = STANDARD.encode(body.as_bytes());
    for line in encoded.as_bytes().chunks(LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push_str("\r\n");
    }
}

/// Header values never span lines, so a stray newline cannot inject headers.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// ASCII subjects are sent as-is. Anything else becomes a sequence of RFC 2047
/// base64 encoded words, folded onto continuation lines.
fn encode_subject(subject: &str) -> String {
    let subject = single_line(subject);
    if subject.is_ascii() {
        return subject;
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for ch in subject.chars() {
        if chunk.len() + ch.len_utf8() > ENCODED_WORD_BYTES {
            words.push(encoded_word(&chunk));
            chunk.clear();
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        words.push(encoded_word(&chunk));
    }

    words.join("\r\n ")
}

fn encoded_word(text: &str) -> String {
    format!("=?utf-8?b?{}?=", STANDARD.encode(text.as_bytes()))
}
