use chrono::{DateTime, FixedOffset};

/// Identity and timestamp found on `author`, `committer` and `tagger` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Signature {
    /// Parse `Name <email> 1257894000 +0100`.
    pub fn decode(line: &str) -> Option<Self> {
        let open = line.find('<')?;
        let close = open + line[open..].find('>')?;

        let name = line[..open].trim().to_string();
        let email = line[open + 1..close].to_string();

        let mut rest = line[close + 1..].split_whitespace();
        let seconds: i64 = rest.next()?.parse().ok()?;
        let offset = parse_offset(rest.next().unwrap_or("+0000"))?;
        let when = DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset);

        Some(Self { name, email, when })
    }
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => (1, tz),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
