//! Character-level helpers for markup text

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape for either quote style, so a value can be spliced between the
/// quotes it was written with
pub fn escape_attribute(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode the named references that appear in hand-written pages plus any
/// numeric reference. Unknown names are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match reference_len(rest).and_then(|len| Some((len, decode_reference(&rest[1..len])?))) {
            Some((len, c)) => {
                decoded.push(c);
                rest = rest[len..].strip_prefix(';').unwrap_or(&rest[len..]);
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

/// Escape every `&` that does not begin a character reference
pub fn escape_stray_ampersands(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (index, c) in text.char_indices() {
        if c == '&' && reference_len(&text[index..]).is_none() {
            escaped.push_str("&amp;");
        } else {
            escaped.push(c);
        }
    }
    escaped
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Stands in for a character the markup parser would reject in text
const MASK: char = '_';

/// The source as the markup parser should see it.
///
/// Bare `&`, `<` and `>` in character data are masked byte for byte, so
/// every offset into the result is also an offset into `source`. Closing
/// tags for elements still open at the end of the input are appended after
/// `source.len()`.
pub fn parser_input(source: &str) -> String {
    let mut input = String::with_capacity(source.len());
    let mut open: Vec<String> = vec![];
    let mut position = 0;

    while position < source.len() {
        let rest = &source[position..];

        if rest.starts_with("<!--") {
            let len = rest[4..].find("-->").map_or(rest.len(), |end| 4 + end + 3);
            input.push_str(&rest[..len]);
            position += len;
            continue;
        }

        if starts_tag(rest) {
            let tag = &rest[..tag_len(rest)];
            input.push_str(tag);
            position += tag.len();

            let name = tag_name(tag);
            if tag.starts_with("</") {
                if let Some(found) = open.iter().rposition(|open| *open == name) {
                    open.truncate(found);
                }
            } else if !opens_element(tag, &name) {
                continue;
            } else if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let body = &source[position..];
                match body.to_ascii_lowercase().find(&format!("</{name}")) {
                    Some(len) => {
                        input.push_str(&body[..len]);
                        position += len;
                    }
                    None => {
                        input.push_str(body);
                        position = source.len();
                        open.push(name);
                    }
                }
            } else {
                open.push(name);
            }
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '&' if reference_len(rest).is_none() => input.push(MASK),
            '<' | '>' => input.push(MASK),
            c => input.push(c),
        }
        position += c.len_utf8();
    }

    for name in open.iter().rev() {
        input.push_str(&format!("</{name}>"));
    }
    input
}

/// Whether `text` begins with a tag, comment or doctype rather than a bare `<`
fn starts_tag(text: &str) -> bool {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.get(1), bytes.get(2)) {
        (Some(b'<'), Some(b'!'), _) => true,
        (Some(b'<'), Some(b'/'), Some(next)) => next.is_ascii_alphabetic(),
        (Some(b'<'), Some(next), _) => next.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Length of the tag at the start of `text` through its closing `>`, or the
/// whole of `text` when the tag never closes
fn tag_len(text: &str) -> usize {
    let mut quote = None;
    let mut after_equals = false;

    for (index, c) in text.char_indices().skip(1) {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '>' => return index + 1,
                '"' | '\'' if after_equals => quote = Some(c),
                _ => {}
            },
        }
        if !c.is_whitespace() {
            after_equals = c == '=';
        }
    }

    text.len()
}

fn opens_element(tag: &str, name: &str) -> bool {
    !tag.starts_with("<!") && !tag.ends_with("/>") && !VOID_ELEMENTS.contains(&name)
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(['<', '/'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

pub fn strip_comments(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<!--") {
        stripped.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => return stripped,
        }
    }
    stripped.push_str(rest);
    stripped
}

/// Length of the `&name` / `&#digits` / `&#xhex` prefix of `text`, excluding
/// any trailing `;`
fn reference_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let (prefix, digits) = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        (2, hex.chars().take_while(char::is_ascii_hexdigit).count())
    } else if let Some(decimal) = body.strip_prefix('#') {
        (1, decimal.chars().take_while(char::is_ascii_digit).count())
    } else if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        (0, body.chars().take_while(char::is_ascii_alphanumeric).count())
    } else {
        (0, 0)
    };
    (digits > 0).then_some(1 + prefix + digits)
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(hex) = reference
        .strip_prefix("#x")
        .or_else(|| reference.strip_prefix("#X"))
    {
        return char::from_u32(u32::from_str_radix(hex, 16).ok()?);
    }
    if let Some(digits) = reference.strip_prefix('#') {
        return char::from_u32(digits.parse().ok()?);
    }
    Some(match reference {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "mdash" => '—',
        "ndash" => '–',
        "hellip" => '…',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        _ => return None,
    })
}
