//! Short flattened previews of page content for listings.

/// Characters of content shown in page listings.
pub const PREVIEW_LENGTH: usize = 250;

/// Flatten markdown-ish content into a single-line preview of at most
/// `length` characters: horizontal rules dropped, headings bolded, newlines
/// collapsed to spaces.
pub fn flatten(content: &str, length: usize) -> String {
  let mut out = String::with_capacity(length.min(content.len()));

  for line in content.lines() {
    let line = line.trim();
    if line.is_empty() || is_horizontal_rule(line) {
      continue;
    }
    if !out.is_empty() {
      out.push(' ');
    }
    match strip_heading(line) {
      Some(heading) => {
        out.push_str("**");
        out.push_str(heading);
        out.push_str("**");
      }
      None => out.push_str(line),
    }
    if out.chars().count() >= length {
      break;
    }
  }

  let truncated: String = out.chars().take(length).collect();
  truncated.trim_end().to_owned()
}

fn is_horizontal_rule(line: &str) -> bool {
  line.len() >= 3
    && (line.chars().all(|c| c == '-') || line.chars().all(|c| c == '*'))
}

/// `# Heading` through `###### Heading` → the heading text.
fn strip_heading(line: &str) -> Option<&str> {
  let hashes = line.chars().take_while(|&c| c == '#').count();
  if (1..=6).contains(&hashes) {
    let rest = &line[hashes..];
    if rest.starts_with(' ') {
      return Some(rest.trim_start());
    }
  }
  None
}
