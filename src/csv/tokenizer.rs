// src/csv/tokenizer.rs

/// Split one CSV line into fields. Quoted fields may contain commas,
/// a doubled `""` inside quotes decodes to a literal `"`. CR and LF
/// outside quotes are dropped. Never fails: malformed quoting degrades
/// into best-effort field boundaries. Always yields at least one field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        cur.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                _ => cur.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut cur)),
                '\r' | '\n' => {}
                _ => cur.push(c),
            }
        }
    }
    fields.push(cur);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn quoted_field_keeps_commas() {
        assert_eq!(split_line(r#""a,b",c"#), vec!["a,b", "c"]);
        assert_eq!(split_line(r#"x,"Vilnius, Senamiestis",y"#), vec!["x", "Vilnius, Senamiestis", "y"]);
    }

    #[test]
    fn doubled_quote_decodes_to_literal_quote() {
        assert_eq!(split_line(r#""a""b""#), vec![r#"a"b"#]);
        assert_eq!(split_line(r#""""""#), vec![r#"""#]);
    }

    #[test]
    fn line_endings_are_dropped() {
        assert_eq!(split_line("a,b\r\n"), vec!["a", "b"]);
        assert_eq!(split_line("a,b\n"), vec!["a", "b"]);
    }

    #[test]
    fn round_trip_without_special_chars() {
        let fields = split_line("one,two,three");
        let joined = fields.join(",");
        assert_eq!(split_line(&joined), fields);
    }
}
