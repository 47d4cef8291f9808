//! Contact form notification templates.
//!
//! Labels follow the submitter's language. User-supplied values are escaped
//! in the HTML body.

use logicton_core::contact::ValidContact;
use logicton_core::locale::Locale;

struct Labels {
    heading: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    subject: &'static str,
    message: &'static str,
    not_given: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::Th => Labels {
            heading: "ข้อความใหม่จากฟอร์มติดต่อ",
            name: "ชื่อ",
            email: "อีเมล",
            phone: "โทรศัพท์",
            company: "บริษัท",
            subject: "หัวข้อ",
            message: "ข้อความ",
            not_given: "-",
        },
        Locale::En => Labels {
            heading: "New Contact Form Message",
            name: "Name",
            email: "Email",
            phone: "Phone",
            company: "Company",
            subject: "Subject",
            message: "Message",
            not_given: "-",
        },
    }
}

/// Email subject line, e.g. `New Contact Form Message: Website quote`.
pub fn subject(contact: &ValidContact) -> String {
    format!("{}: {}", labels(contact.language).heading, contact.subject)
}

/// Plain-text body, also used as the chat message.
pub fn text(contact: &ValidContact) -> String {
    let l = labels(contact.language);
    format!(
        "{heading}\n\n\
         {name_l}: {name}\n\
         {email_l}: {email}\n\
         {phone_l}: {phone}\n\
         {company_l}: {company}\n\
         {subject_l}: {subject}\n\n\
         {message_l}:\n{message}\n",
        heading = l.heading,
        name_l = l.name,
        name = contact.name,
        email_l = l.email,
        email = contact.email,
        phone_l = l.phone,
        phone = contact.phone.as_deref().unwrap_or(l.not_given),
        company_l = l.company,
        company = contact.company.as_deref().unwrap_or(l.not_given),
        subject_l = l.subject,
        subject = contact.subject,
        message_l = l.message,
        message = contact.message,
    )
}

/// HTML body.
pub fn html(contact: &ValidContact) -> String {
    let l = labels(contact.language);
    let row = |label: &str, value: &str| {
        format!(
            "<tr><td style=\"padding:4px 12px 4px 0;font-weight:bold\">{label}</td>\
             <td style=\"padding:4px 0\">{}</td></tr>",
            escape(value)
        )
    };

    let mut rows = String::new();
    rows.push_str(&row(l.name, &contact.name));
    rows.push_str(&row(l.email, &contact.email));
    rows.push_str(&row(l.phone, contact.phone.as_deref().unwrap_or(l.not_given)));
    rows.push_str(&row(l.company, contact.company.as_deref().unwrap_or(l.not_given)));
    rows.push_str(&row(l.subject, &contact.subject));

    format!(
        "<!DOCTYPE html><html lang=\"{lang}\"><body style=\"font-family:sans-serif\">\
         <h2>{heading}</h2><table>{rows}</table>\
         <h3>{message_l}</h3><p style=\"white-space:pre-wrap\">{message}</p>\
         </body></html>",
        lang = contact.language,
        heading = l.heading,
        message_l = l.message,
        message = escape(&contact.message),
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(language: Locale) -> ValidContact {
        ValidContact {
            name: "Somchai".into(),
            email: "somchai@example.co.th".into(),
            phone: None,
            company: Some("Acme & Sons".into()),
            subject: "Website quote".into(),
            message: "<script>alert(1)</script>".into(),
            language,
        }
    }

    #[test]
    fn subject_follows_language() {
        assert_eq!(
            subject(&contact(Locale::En)),
            "New Contact Form Message: Website quote"
        );
        assert_eq!(
            subject(&contact(Locale::Th)),
            "ข้อความใหม่จากฟอร์มติดต่อ: Website quote"
        );
    }

    #[test]
    fn text_lists_every_field() {
        let body = text(&contact(Locale::En));
        assert!(body.contains("Name: Somchai"));
        assert!(body.contains("Phone: -"));
        assert!(body.contains("Company: Acme & Sons"));
        assert!(body.ends_with("<script>alert(1)</script>\n"));
    }

    #[test]
    fn html_escapes_user_input() {
        let body = html(&contact(Locale::Th));
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("Acme &amp; Sons"));
        assert!(body.contains("lang=\"th\""));
        assert!(!body.contains("<script>"));
    }
}
