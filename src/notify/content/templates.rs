use crate::error::HubmailError;
use crate::notify::content::{finalize_message, ContentGenerator, GeneratedMessage};
use crate::notify::request::{
    ConfirmationPayload, Language, NotificationKind, NotificationRequest, WelcomePayload,
};
use crate::server::config::{HubmailConfigContent, MessageTemplateConfig};
use crate::templating::TemplateString;
use async_trait::async_trait;

const WELCOME_SUBJECT_EN: &str = "Welcome to AGS Activities Hub!";
const WELCOME_BODY_EN: &str = r#"<div dir="ltr">
  <h2>Welcome, {name}!</h2>
  <p>Your AGS Activities Hub account is ready. Browse the activity catalog, register your children for upcoming programs, and keep an eye on the calendar for new events.</p>
  <p>We are glad to have you with us.</p>
  <p>AGS Activities Hub</p>
</div>"#;

const WELCOME_SUBJECT_AR: &str = "أهلاً بك في مركز أنشطة AGS!";
const WELCOME_BODY_AR: &str = r#"<div dir="rtl">
  <h2>أهلاً {name}!</h2>
  <p>حسابك في مركز أنشطة AGS جاهز. تصفح قائمة الأنشطة وسجل أبناءك في البرامج القادمة وتابع التقويم لمعرفة الفعاليات الجديدة.</p>
  <p>يسعدنا انضمامك إلينا.</p>
  <p>مركز أنشطة AGS</p>
</div>"#;

const CONFIRMATION_SUBJECT_EN: &str = "Registration confirmed: {activity_title}";
const CONFIRMATION_BODY_EN: &str = r#"<div dir="ltr">
  <h2>Registration confirmed</h2>
  <p>Dear {parent_name},</p>
  <p>{student_name} is registered for <strong>{activity_title}</strong>.</p>
  <ul>
    <li>Date: {date}</li>
    <li>Time: {time}</li>
    <li>Location: {location}</li>
    <li>Cost: {cost}</li>
  </ul>
  {payment_instructions}
  <p>AGS Activities Hub</p>
</div>"#;

const CONFIRMATION_SUBJECT_AR: &str = "تأكيد التسجيل: {activity_title}";
const CONFIRMATION_BODY_AR: &str = r#"<div dir="rtl">
  <h2>تم تأكيد التسجيل</h2>
  <p>عزيزي/عزيزتي {parent_name}،</p>
  <p>تم تسجيل {student_name} في <strong>{activity_title}</strong>.</p>
  <ul>
    <li>التاريخ: {date}</li>
    <li>الوقت: {time}</li>
    <li>المكان: {location}</li>
    <li>التكلفة: {cost}</li>
  </ul>
  {payment_instructions}
  <p>مركز أنشطة AGS</p>
</div>"#;

const PAYMENT_INSTRUCTIONS_EN: &str =
    "<p>Please complete the payment at the school finance office before the activity date to confirm your spot.</p>";
const PAYMENT_INSTRUCTIONS_AR: &str =
    "<p>يرجى إتمام الدفع لدى مكتب الشؤون المالية في المدرسة قبل موعد النشاط لتأكيد المقعد.</p>";

#[derive(Clone, Debug)]
struct MessageTemplate {
    subject: TemplateString,
    body: TemplateString,
}

/// Deterministic strategy: a fixed subject/body template per (kind,
/// language), interpolated with the payload's fields.
#[derive(Clone, Debug)]
pub struct TemplateGenerator {
    welcome_en: MessageTemplate,
    welcome_ar: MessageTemplate,
    confirmation_en: MessageTemplate,
    confirmation_ar: MessageTemplate,
}

impl TemplateGenerator {
    pub fn from_config(config: &HubmailConfigContent) -> Result<Self, HubmailError> {
        let overrides = config.templates.as_ref();
        let generator = TemplateGenerator {
            welcome_en: resolve_template(
                overrides
                    .and_then(|templates| templates.welcome.as_ref())
                    .and_then(|welcome| welcome.en.as_ref()),
                WELCOME_SUBJECT_EN,
                WELCOME_BODY_EN,
            ),
            welcome_ar: resolve_template(
                overrides
                    .and_then(|templates| templates.welcome.as_ref())
                    .and_then(|welcome| welcome.ar.as_ref()),
                WELCOME_SUBJECT_AR,
                WELCOME_BODY_AR,
            ),
            confirmation_en: resolve_template(
                overrides
                    .and_then(|templates| templates.confirmation.as_ref())
                    .and_then(|confirmation| confirmation.en.as_ref()),
                CONFIRMATION_SUBJECT_EN,
                CONFIRMATION_BODY_EN,
            ),
            confirmation_ar: resolve_template(
                overrides
                    .and_then(|templates| templates.confirmation.as_ref())
                    .and_then(|confirmation| confirmation.ar.as_ref()),
                CONFIRMATION_SUBJECT_AR,
                CONFIRMATION_BODY_AR,
            ),
        };
        generator.validate()?;
        Ok(generator)
    }

    // A missing or blank template is a startup-time configuration error,
    // never a per-request one.
    fn validate(&self) -> Result<(), HubmailError> {
        let slots = [
            ("welcome.en", &self.welcome_en),
            ("welcome.ar", &self.welcome_ar),
            ("confirmation.en", &self.confirmation_en),
            ("confirmation.ar", &self.confirmation_ar),
        ];
        for (name, template) in slots {
            if template.subject.is_blank() || template.body.is_blank() {
                return Err(HubmailError::ConfigurationError {
                    message: format!(
                        "content.templates.{name} must have a non-empty subject and body"
                    ),
                });
            }
        }
        Ok(())
    }

    fn template(&self, kind: NotificationKind, language: Language) -> &MessageTemplate {
        match (kind, language) {
            (NotificationKind::Welcome, Language::En) => &self.welcome_en,
            (NotificationKind::Welcome, Language::Ar) => &self.welcome_ar,
            (NotificationKind::Confirmation, Language::En) => &self.confirmation_en,
            (NotificationKind::Confirmation, Language::Ar) => &self.confirmation_ar,
        }
    }

    fn render_welcome(&self, payload: &WelcomePayload, language: Language) -> (String, String) {
        let template = self.template(NotificationKind::Welcome, language);
        let values = vec![("name", payload.name.as_str())];
        (
            template.subject.execute(values.clone()),
            template.body.execute(values),
        )
    }

    fn render_confirmation(
        &self,
        payload: &ConfirmationPayload,
        language: Language,
    ) -> (String, String) {
        let template = self.template(NotificationKind::Confirmation, language);
        let cost = cost_line(payload.cost, language);
        let values = vec![
            ("parent_name", payload.parent_name.as_str()),
            ("student_name", payload.student_name.as_str()),
            ("activity_title", payload.activity_title.as_str()),
            ("date", payload.date.as_str()),
            ("time", payload.time.as_str()),
            ("location", payload.location.as_str()),
            ("cost", cost.as_str()),
            (
                "payment_instructions",
                payment_instructions(payload.cost, language),
            ),
        ];
        (
            template.subject.execute(values.clone()),
            template.body.execute(values),
        )
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate(
        &self,
        request: &NotificationRequest,
        language: Language,
    ) -> Result<GeneratedMessage, HubmailError> {
        let (subject, body) = match request {
            NotificationRequest::Welcome(payload) => self.render_welcome(payload, language),
            NotificationRequest::Confirmation(payload) => {
                self.render_confirmation(payload, language)
            }
        };
        finalize_message(request, subject, body)
    }
}

fn resolve_template(
    override_template: Option<&MessageTemplateConfig>,
    subject: &str,
    body: &str,
) -> MessageTemplate {
    match override_template {
        Some(template) => MessageTemplate {
            subject: template.subject.clone(),
            body: template.body.clone(),
        },
        None => MessageTemplate {
            subject: subject.into(),
            body: body.into(),
        },
    }
}

// A free activity renders a literal, not a zero amount.
fn cost_line(cost: Option<f64>, language: Language) -> String {
    match cost {
        Some(amount) if amount > 0.0 => match language {
            Language::En => format!("{} SAR", format_amount(amount)),
            Language::Ar => format!("{} ريال سعودي", format_amount(amount)),
        },
        _ => match language {
            Language::En => "Free".to_string(),
            Language::Ar => "مجاناً".to_string(),
        },
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

fn payment_instructions(cost: Option<f64>, language: Language) -> &'static str {
    match cost {
        Some(amount) if amount > 0.0 => match language {
            Language::En => PAYMENT_INSTRUCTIONS_EN,
            Language::Ar => PAYMENT_INSTRUCTIONS_AR,
        },
        _ => "",
    }
}
