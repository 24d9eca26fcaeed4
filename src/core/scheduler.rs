use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Display format for proposed slots, e.g. "Monday, March 04 at 10:00 AM"
pub const SLOT_FORMAT: &str = "%A, %B %d at %I:%M %p";

/// Interview status recorded when an invitation goes out
pub const INVITATION_SENT: &str = "Invitation Sent";

/// Daily interview start times (morning, afternoon)
const SLOT_TIMES: [(u32, u32); 2] = [(10, 0), (14, 0)];

#[inline]
fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Propose `count` interview slots on weekdays
///
/// Starts `min_days_ahead` days after `today` and walks forward, offering
/// the morning then the afternoon slot of each weekday.
pub fn interview_slots(today: NaiveDate, count: usize, min_days_ahead: u32) -> Vec<NaiveDateTime> {
    let mut slots = Vec::with_capacity(count);
    let mut day = today + Duration::days(i64::from(min_days_ahead));

    while slots.len() < count {
        if !is_weekend(day) {
            for (hour, minute) in SLOT_TIMES {
                if slots.len() == count {
                    break;
                }
                if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                    slots.push(day.and_time(time));
                }
            }
        }
        day += Duration::days(1);
    }

    slots
}

/// Format slots for emails and storage
pub fn format_slots(slots: &[NaiveDateTime]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| slot.format(SLOT_FORMAT).to_string())
        .collect()
}

/// Prompt asking the LLM to draft an invitation email
pub fn invitation_prompt(
    candidate_name: &str,
    job_title: &str,
    company_name: &str,
    slots: &[String],
) -> String {
    let slot_lines: String = slots.iter().map(|slot| format!("- {slot}\n")).collect();

    format!(
        "Write a professional email inviting {candidate_name} for an interview for the \
         {job_title} position at {company_name}.\n\
         Include the following:\n\
         1. A congratulatory message for being shortlisted\n\
         2. Brief mention of the impressive qualifications\n\
         3. Offer exactly these interview time slots, listed as given:\n\
         {slot_lines}\
         4. Ask about their preferred interview format (video call, phone, in-person)\n\
         5. Request confirmation\n\
         6. Professional closing\n\n\
         Do not propose any other times. Keep the tone professional but friendly."
    )
}

/// Template invitation used when no LLM draft is available
pub fn fallback_invitation(
    candidate_name: &str,
    job_title: &str,
    company_name: &str,
    slots: &[String],
) -> String {
    let slot_lines: String = slots.iter().map(|slot| format!("- {slot}\n")).collect();

    format!(
        "Subject: Interview Invitation - {job_title} Position at {company_name}\n\
         \n\
         Dear {candidate_name},\n\
         \n\
         Congratulations! We are pleased to inform you that you have been shortlisted for the \
         {job_title} position at {company_name}. Your qualifications and experience impressed \
         our hiring team, and we would like to invite you for an interview.\n\
         \n\
         Please let us know which of the following time slots works best for you:\n\
         \n\
         {slot_lines}\
         \n\
         Additionally, please indicate your preferred interview format (video call, phone call, \
         or in-person).\n\
         \n\
         We look forward to your confirmation and to learning more about your skills and experience.\n\
         \n\
         Best regards,\n\
         Hiring Team\n\
         {company_name}\n"
    )
}
