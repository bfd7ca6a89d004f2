use crate::api::EmailRecord;
use crate::error::AppResult;

const SUMMARY_WIDTH: usize = 160;

pub fn print_line(line: &str) -> AppResult<()> {
    println!("{line}");
    Ok(())
}

pub fn render_email_list(heading: &str, emails: &[EmailRecord]) -> String {
    if emails.is_empty() {
        return format!("{heading}: no emails");
    }

    let mut lines = vec![format!("{heading}: {} emails", emails.len())];
    for (index, email) in emails.iter().enumerate() {
        let sender = email.sender.as_deref().unwrap_or("(unknown sender)");
        let subject = email.subject.as_deref().unwrap_or("(no subject)");
        let category = email.category.as_deref().unwrap_or("Uncategorized");
        let urgency = email.urgency.as_deref().unwrap_or("?");
        let marker = if email.is_urgent() { "!" } else { " " };

        lines.push(String::new());
        lines.push(format!("{}.{marker}[LVL {urgency}] {subject}", index + 1));
        lines.push(format!("   from: {sender}"));
        lines.push(format!("   category: {category}"));
        lines.push(format!("   {}", format_summary(email.summary.as_deref())));
    }

    lines.join("\n")
}

fn format_summary(summary: Option<&str>) -> String {
    let summary = summary.unwrap_or("(no summary)");
    let decoded = html_escape::decode_html_entities(summary).to_string();
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.len() <= SUMMARY_WIDTH {
        return compact;
    }

    let mut end = SUMMARY_WIDTH;
    while !compact.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &compact[..end])
}
