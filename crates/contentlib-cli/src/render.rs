//! Terminal rendering for listings, detail pages and the privacy policy.

use contentlib_core::fetch::Listing;
use contentlib_core::form::DynamicLeadForm;
use contentlib_core::model::ContentItem;
use contentlib_core::privacy::{Block, PrivacyPolicy};
use contentlib_core::urls::UrlResolver;

// ── ANSI color helpers ───────────────────────────────────────────────

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

// ── Pretty output helpers ────────────────────────────────────────────

pub fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

pub fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

pub fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

pub fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn kv_opt(key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        kv_line(key, value);
    }
}

// ── Listing ──────────────────────────────────────────────────────────

pub fn print_listing(
    listing: &Listing,
    shown: &[&ContentItem],
    categories: &[String],
    selected: &str,
    resolver: &UrlResolver,
) {
    header("📚", "Case studies");

    let chips: Vec<String> = categories
        .iter()
        .map(|c| {
            if c == selected {
                format!("{BOLD}{CYAN}[{c}]{RESET}")
            } else {
                format!("{DIM}{c}{RESET}")
            }
        })
        .collect();
    println!("  {}", chips.join("  "));
    println!();

    if shown.is_empty() {
        println!("  {DIM}No case studies match your filters.{RESET}");
    }
    for item in shown {
        print_card(item, resolver);
    }

    if let Some(count) = listing.count {
        kv_line("Total", &count.to_string());
    }
    kv_opt("Next page", listing.next.as_deref());
    kv_opt("Previous page", listing.previous.as_deref());
    println!();
}

fn print_card(item: &ContentItem, resolver: &UrlResolver) {
    let category = item.category_name();
    println!("  {BOLD}{}{RESET}  {DIM}#{} · {}{RESET}", item.title, item.id, item.slug);
    if !category.is_empty() {
        println!("  {CYAN}{category}{RESET}");
    }
    if !item.short_description.trim().is_empty() {
        println!("  {}", item.short_description.trim());
    }
    if let Some(image) = item.banner_image.as_deref().and_then(|p| resolver.resolve(p)) {
        println!("  {DIM}{image}{RESET}");
    }
    println!();
}

// ── Detail ───────────────────────────────────────────────────────────

pub fn print_detail(item: &ContentItem, resolver: &UrlResolver) {
    header("📄", &item.title);
    kv_line("ID", &item.id.to_string());
    kv_line("Slug", &item.slug);
    kv_opt("Category", Some(item.category_name()));
    kv_opt("Client", item.client_name.as_deref());
    kv_opt("Industry", item.client_industry.as_deref());
    kv_opt("Author", item.author_full_name.as_deref().or(item.author_username.as_deref()));
    kv_opt("Reading time", item.estimated_time.as_deref());
    kv_opt("Published", item.published_at.as_deref());
    kv_line("Views", &item.views_count.to_string());
    kv_line("Downloads", &item.downloads_count.to_string());
    kv_opt(
        "Banner",
        item.banner_image.as_deref().and_then(|p| resolver.resolve(p)).as_deref(),
    );
    println!();

    if !item.short_description.trim().is_empty() {
        println!("  {BOLD}{}{RESET}", item.short_description.trim());
        println!();
    }
    for line in strip_html(&item.content).lines() {
        println!("  {line}");
    }
    println!();

    let form = DynamicLeadForm::for_item(item);
    if !form.fields().is_empty() {
        header("📝", "Lead form");
        for field in form.fields() {
            let hint = if field.placeholder.trim().is_empty() {
                String::new()
            } else {
                format!("{DIM}({}){RESET}", field.placeholder.trim())
            };
            println!("  {CYAN}├─{RESET} {} {hint}", field.field_name);
        }
        println!();
    }

    if let Some(link) = item.external_link() {
        kv_line("After submitting", &format!("opens {link}"));
    } else if let Some(file) = item.downloadable_file().and_then(|f| resolver.resolve(f)) {
        kv_line("After submitting", &format!("downloads {file}"));
    }
}

// ── Privacy policy ───────────────────────────────────────────────────

pub fn print_privacy(policy: &PrivacyPolicy) {
    header("🔒", policy.title().unwrap_or("Privacy Policy"));
    for section in policy.sections() {
        if let Some(heading) = &section.heading {
            println!("  {BOLD}{heading}{RESET}");
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => println!("  {text}"),
                Block::Html(html) => {
                    for line in strip_html(html).lines() {
                        println!("  {line}");
                    }
                }
            }
            println!();
        }
    }
}

// ── HTML to text ─────────────────────────────────────────────────────

/// Tags that end a line of text.
const BLOCK_TAGS: [&str; 12] = [
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Flatten HTML into readable plain text: block tags become line breaks,
/// list items get a bullet, the common entities are decoded and runs of
/// blank lines are collapsed.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('>') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let tag = tail[1..end].trim().to_ascii_lowercase();
        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();
        if BLOCK_TAGS.contains(&name) {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            if name == "li" && !closing {
                out.push_str("• ");
            }
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);

    let decoded = decode_entities(&out);
    let mut text = String::new();
    let mut blank = true;
    for line in decoded.lines().map(str::trim) {
        if line.is_empty() {
            if !blank {
                text.push('\n');
            }
            blank = true;
            continue;
        }
        text.push_str(line);
        text.push('\n');
        blank = false;
    }
    text.trim_end().to_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_structure() {
        let html = "<h2>Results</h2><p>Throughput up&nbsp;40%.</p><ul><li>Fewer scans</li><li>Less &amp; faster</li></ul>";
        assert_eq!(
            strip_html(html),
            "Results\nThroughput up 40%.\n• Fewer scans\n• Less & faster"
        );
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(strip_html("<p>One</p>\n\n\n<p>Two</p>"), "One\n\nTwo");
    }

    #[test]
    fn unterminated_tag_is_kept_as_text() {
        assert_eq!(strip_html("a <b and c"), "a <b and c");
    }
}
