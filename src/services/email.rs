// src/services/email.rs
//
// Reservation confirmation e-mails, rendered from the admin-editable template
// and delivered through the Resend HTTP API.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    common::error::AppError,
    db::ContentRepository,
    models::{
        content::{
            CONTACT_SECTION, ContactSection, EMAIL_PAGE, EMAIL_TEMPLATE_SECTION,
            EmailTemplateConfig, GLOBAL_PAGE,
        },
        reservation::Reservation,
    },
};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const FALLBACK_WHATSAPP: &str = "6281130700206";

/// Sends the booking confirmation for a reservation.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn send_confirmation(&self, reservation: &Reservation) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// `1250000.75` -> `1,250,001`
pub fn format_amount(amount: Decimal) -> String {
    let whole = amount.round_dp(0).abs().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount.is_sign_negative() && !amount.round_dp(0).is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn fill(template: &str, reservation: &Reservation) -> String {
    template
        .replace("{booking_code}", &reservation.booking_code)
        .replace("{guest_name}", &reservation.guest_name)
        .replace("{nights}", &reservation.nights.to_string())
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><td style=\"padding:8px;border:1px solid #e5e7eb;\"><strong>{}</strong></td>\
         <td style=\"padding:8px;border:1px solid #e5e7eb;\">{}</td></tr>",
        escape_html(label),
        value
    )
}

fn bullet_list(items: &[String]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{}</ul>", items)
}

pub fn render_confirmation(
    reservation: &Reservation,
    template: &EmailTemplateConfig,
    whatsapp_number: &str,
) -> RenderedEmail {
    let t = template;
    let mut rows = vec![
        row(
            t.label("reservation_number", "RESERVATION NUMBER"),
            &escape_html(&reservation.booking_code),
        ),
        row(t.label("status", "STATUS"), reservation.status.as_str()),
        row(t.label("check_in", "CHECK-IN"), &reservation.check_in.to_string()),
        row(t.label("check_out", "CHECK-OUT"), &reservation.check_out.to_string()),
        row(t.label("guests", "GUESTS"), &reservation.guests.to_string()),
        row(
            t.label("reservation_under", "RESERVED BY"),
            &escape_html(&reservation.guest_name),
        ),
        row(
            t.label("contact", "CONTACT"),
            &format!(
                "{}<br>{}",
                escape_html(&reservation.guest_email),
                escape_html(&reservation.guest_phone)
            ),
        ),
        row(
            t.label("room_type", "Room Type:"),
            &escape_html(&reservation.room_type_name),
        ),
        row(
            t.label("rate_plan", "Package:"),
            &escape_html(&reservation.rate_plan_name),
        ),
    ];
    if !reservation.special_requests.trim().is_empty() {
        rows.push(row(
            t.label("special_req", "Special Requests:"),
            &escape_html(&reservation.special_requests),
        ));
    }
    let room_charge = reservation.total_amount + reservation.discount_amount;
    rows.push(row(
        &fill(t.label("room_charge", "Room charge ({nights} nights)"), reservation),
        &format!("Rp {}", format_amount(room_charge)),
    ));
    if !reservation.discount_amount.is_zero() {
        let code = reservation.promo_code.as_deref().unwrap_or_default();
        rows.push(row(
            &format!("{} {}", t.label("discount", "Discount"), code),
            &format!("- Rp {}", format_amount(reservation.discount_amount)),
        ));
    }
    rows.push(row(
        t.label("total_amount", "Total Amount"),
        &format!("<strong>Rp {}</strong>", format_amount(reservation.total_amount)),
    ));

    let mut html = format!(
        "<div style=\"font-family:Arial,sans-serif;max-width:600px;margin:0 auto;\">\
         <div style=\"background:#059669;padding:24px;text-align:center;color:#fff;\">\
         <h1 style=\"margin:0;\">{}</h1><p style=\"margin:8px 0 0 0;\">{}</p></div>\
         <div style=\"padding:24px;\"><p>{}</p><p>{}</p>\
         <table style=\"width:100%;border-collapse:collapse;\">{}</table>",
        escape_html(&t.header_text_top),
        escape_html(&t.header_text_bottom),
        escape_html(&fill(&t.greeting_template, reservation)),
        escape_html(&t.intro_text),
        rows.concat(),
    );

    let payment = &t.payment_details;
    if t.show_payment && payment.show {
        html.push_str(&format!(
            "<h3>{}</h3><p>{} {}<br>{} {}<br>{} {}</p>",
            escape_html(t.label("payment_info", "Please transfer the payment to:")),
            escape_html(t.label("bank", "Bank:")),
            escape_html(&payment.bank_name),
            escape_html(t.label("account", "Account No.:")),
            escape_html(&payment.account_number),
            escape_html(t.label("holder", "Account Holder:")),
            escape_html(&payment.account_holder),
        ));
    }
    if !t.important_notes_list.is_empty() {
        html.push_str(&format!(
            "<h3>{}</h3>{}",
            escape_html(t.label("important_notes", "Important Notes:")),
            bullet_list(&t.important_notes_list)
        ));
    }
    if t.show_policy && !t.cancellation_policy_list.is_empty() {
        html.push_str(&format!(
            "<h3>{}</h3>{}",
            escape_html(t.label("cancellation_policy", "Cancellation Policy")),
            bullet_list(&t.cancellation_policy_list)
        ));
    }

    let digits: String = whatsapp_number.chars().filter(char::is_ascii_digit).collect();
    html.push_str(&format!(
        "<p><a href=\"https://wa.me/{}?text=Booking%20{}\" \
         style=\"display:inline-block;background:#25D366;color:#fff;padding:12px 24px;\
         text-decoration:none;border-radius:8px;\">{}</a></p></div>\
         <div style=\"background:#064e3b;padding:16px;text-align:center;color:#d1fae5;\">{}</div></div>",
        digits,
        escape_html(&reservation.booking_code),
        escape_html(t.label("whatsapp", "Contact us on WhatsApp")),
        escape_html(&t.footer_address),
    ));

    RenderedEmail {
        to: reservation.guest_email.clone(),
        subject: fill(&t.subject_template, reservation),
        html,
    }
}

#[derive(Clone)]
pub struct EmailService {
    content: ContentRepository,
    http: reqwest::Client,
    api_key: Option<String>,
    sender: String,
}

impl EmailService {
    pub fn new(content: ContentRepository, api_key: Option<String>, sender: String) -> Self {
        Self {
            content,
            http: reqwest::Client::new(),
            api_key,
            sender,
        }
    }

    async fn template(&self) -> EmailTemplateConfig {
        match self.content.find(EMAIL_PAGE, EMAIL_TEMPLATE_SECTION).await {
            Ok(Some(doc)) => serde_json::from_value(doc.content).unwrap_or_else(|e| {
                tracing::warn!("stored e-mail template is malformed, using defaults: {}", e);
                EmailTemplateConfig::default()
            }),
            Ok(None) => EmailTemplateConfig::default(),
            Err(e) => {
                tracing::warn!("could not load e-mail template, using defaults: {:?}", e);
                EmailTemplateConfig::default()
            }
        }
    }

    async fn whatsapp_number(&self) -> String {
        self.content
            .find(GLOBAL_PAGE, CONTACT_SECTION)
            .await
            .ok()
            .flatten()
            .and_then(|doc| serde_json::from_value::<ContactSection>(doc.content).ok())
            .map(|contact| contact.number)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_WHATSAPP.to_string())
    }

    async fn deliver(&self, email: &RenderedEmail) -> Result<(), AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::info!(
                to = %email.to,
                subject = %email.subject,
                "no e-mail API key configured, confirmation logged instead of sent"
            );
            return Ok(());
        };

        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&json!({
                "from": self.sender,
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("e-mail request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "e-mail provider returned {}: {}",
                status, body
            )));
        }
        tracing::info!(to = %email.to, "reservation e-mail sent");
        Ok(())
    }
}

#[async_trait]
impl ReservationNotifier for EmailService {
    async fn send_confirmation(&self, reservation: &Reservation) -> Result<(), AppError> {
        let template = self.template().await;
        let whatsapp = self.whatsapp_number().await;
        let email = render_confirmation(reservation, &template, &whatsapp);
        self.deliver(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reservation::ReservationStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn reservation() -> Reservation {
        let now = Utc::now();
        Reservation {
            id: Uuid::new_v4(),
            booking_code: "SGH-20250301-ABC123".into(),
            guest_name: "Ana <script>".into(),
            guest_email: "ana@example.com".into(),
            guest_phone: "+62 811".into(),
            room_type_id: Uuid::new_v4(),
            room_type_name: "Deluxe".into(),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            nights: 2,
            guests: 2,
            special_requests: "Late arrival & quiet room".into(),
            rate_plan_id: None,
            rate_plan_name: "Room Only".into(),
            promo_code: Some("SPRING".into()),
            rate_per_night: Decimal::from(500_000),
            total_amount: Decimal::from(900_000),
            discount_amount: Decimal::from(100_000),
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn amounts_use_thousand_separators() {
        assert_eq!(format_amount(Decimal::from(1_250_000)), "1,250,000");
        assert_eq!(format_amount(Decimal::from(999)), "999");
        assert_eq!(format_amount(Decimal::new(10006, 1)), "1,001");
        assert_eq!(format_amount(Decimal::ZERO), "0");
    }

    #[test]
    fn guest_input_is_escaped() {
        let email = render_confirmation(&reservation(), &EmailTemplateConfig::default(), "+62 811-3070");
        assert!(email.html.contains("Ana &lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("Late arrival &amp; quiet room"));
        assert!(email.html.contains("https://wa.me/628113070"));
    }

    #[test]
    fn placeholders_are_filled() {
        let email = render_confirmation(&reservation(), &EmailTemplateConfig::default(), "1");
        assert_eq!(email.subject, "Reservation Confirmation - SGH-20250301-ABC123");
        assert_eq!(email.to, "ana@example.com");
        assert!(email.html.contains("Room charge (2 nights)"));
        assert!(email.html.contains("Rp 1,000,000"));
        assert!(email.html.contains("Rp 900,000"));
    }

    #[test]
    fn hidden_sections_are_left_out() {
        let mut template = EmailTemplateConfig::default();
        template.show_policy = false;
        template.important_notes_list.clear();
        let email = render_confirmation(&reservation(), &template, "1");
        assert!(!email.html.contains("Cancellation Policy"));
        assert!(!email.html.contains("Important Notes"));
    }
}
