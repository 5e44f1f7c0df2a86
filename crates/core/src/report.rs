//! Plain-text client feedback report for a brochure.
//!
//! The report is assembled from the brochure, its pages and their comments
//! and rendered as a downloadable `.txt` document. Only pages that carry at
//! least one comment get a section.

use std::fmt;

use serde::Serialize;

use crate::brochure::PageKind;
use crate::progress::completion_percent;
use crate::roles::Role;
use crate::status::{ApprovalStatus, BrochureStatus};
use crate::types::Timestamp;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

/// A page comment as seen by the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportComment {
    pub text: String,
    pub author_name: String,
    pub author_role: Role,
    pub marked_done: bool,
    pub created_at: Timestamp,
}

/// A brochure page and its comments, input to [`FeedbackReport::build`].
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub page_number: i32,
    pub approval_status: ApprovalStatus,
    pub updated_at: Timestamp,
    pub comments: Vec<ReportComment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub page_number: i32,
    pub page_title: String,
    pub approval_status: ApprovalStatus,
    pub last_updated: Timestamp,
    pub manager_comments: Vec<ReportComment>,
    pub employee_comments: Vec<ReportComment>,
    pub total_comments: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    pub project_name: String,
    pub status: BrochureStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub total_pages: usize,
    pub approved_pages: usize,
    pub pending_pages: usize,
    pub rejected_pages: usize,
    pub completion_percentage: i32,
    pub total_feedback_items: usize,
    pub manager_feedback_items: usize,
    pub employee_feedback_items: usize,
    pub sections: Vec<ReportSection>,
}

impl FeedbackReport {
    pub fn build(
        client_name: &str,
        status: BrochureStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        pages: Vec<ReportPage>,
    ) -> Self {
        let count = |s: ApprovalStatus| pages.iter().filter(|p| p.approval_status == s).count();
        let total_pages = pages.len();
        let approved_pages = count(ApprovalStatus::Approved);
        let pending_pages = count(ApprovalStatus::Pending);
        let rejected_pages = count(ApprovalStatus::Rejected);

        let mut sections = Vec::new();
        for page in pages {
            if page.comments.is_empty() {
                continue;
            }
            // Page numbers are validated on insert, so this only guards
            // against hand-edited rows.
            let page_title = PageKind::from_page_number(page.page_number)
                .map(PageKind::report_title)
                .unwrap_or_else(|_| format!("Page {}", page.page_number));
            let total_comments = page.comments.len();
            let (manager_comments, rest): (Vec<_>, Vec<_>) = page
                .comments
                .into_iter()
                .partition(|c| c.author_role == Role::Manager);
            let employee_comments = rest
                .into_iter()
                .filter(|c| c.author_role == Role::Employee)
                .collect();

            sections.push(ReportSection {
                page_number: page.page_number,
                page_title,
                approval_status: page.approval_status,
                last_updated: page.updated_at,
                manager_comments,
                employee_comments,
                total_comments,
            });
        }

        let total_feedback_items = sections.iter().map(|s| s.total_comments).sum();
        let manager_feedback_items = sections.iter().map(|s| s.manager_comments.len()).sum();
        let employee_feedback_items = sections.iter().map(|s| s.employee_comments.len()).sum();

        Self {
            project_name: format!("{client_name}'s Brochure Project"),
            status,
            created_at,
            updated_at,
            total_pages,
            approved_pages,
            pending_pages,
            rejected_pages,
            completion_percentage: completion_percent(approved_pages as u32, total_pages as u32),
            total_feedback_items,
            manager_feedback_items,
            employee_feedback_items,
            sections,
        }
    }

    /// Render the downloadable text document.
    pub fn render_text(&self, generated_at: Timestamp) -> String {
        TextReport {
            report: self,
            generated_at,
        }
        .to_string()
    }
}

/// Download filename for a report generated at `generated_at`.
pub fn report_filename(generated_at: Timestamp) -> String {
    format!(
        "Brochure_Feedback_Report_{}.txt",
        generated_at.format(DATE_FMT)
    )
}

struct TextReport<'a> {
    report: &'a FeedbackReport,
    generated_at: Timestamp,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        writeln!(f, "BROCHURE PROJECT FEEDBACK REPORT")?;
        writeln!(f, "===============================")?;
        writeln!(f)?;
        writeln!(f, "Project: {}", r.project_name)?;
        writeln!(
            f,
            "Generated: {} at {}",
            self.generated_at.format(DATE_FMT),
            self.generated_at.format(TIME_FMT)
        )?;
        writeln!(
            f,
            "Report Period: {} - {}",
            r.created_at.format(DATE_FMT),
            r.updated_at.format(DATE_FMT)
        )?;
        writeln!(f)?;

        writeln!(f, "EXECUTIVE SUMMARY")?;
        writeln!(f, "================")?;
        writeln!(
            f,
            "Project Status: {}",
            r.status.as_str().to_uppercase().replace('_', " ")
        )?;
        writeln!(f, "Completion Progress: {}%", r.completion_percentage)?;
        writeln!(f)?;
        writeln!(f, "Page Approval Status:")?;
        writeln!(f, "- Total Pages: {}", r.total_pages)?;
        writeln!(f, "- Approved: {}", r.approved_pages)?;
        writeln!(f, "- Pending Review: {}", r.pending_pages)?;
        writeln!(f, "- Requiring Changes: {}", r.rejected_pages)?;
        writeln!(f)?;
        writeln!(f, "Feedback Summary:")?;
        writeln!(f, "- Total Feedback Items: {}", r.total_feedback_items)?;
        writeln!(f, "- Management Feedback: {}", r.manager_feedback_items)?;
        writeln!(f, "- Design Team Feedback: {}", r.employee_feedback_items)?;
        writeln!(f)?;

        writeln!(f, "DETAILED FEEDBACK BY SECTION")?;
        writeln!(f, "============================")?;
        for section in &r.sections {
            writeln!(f)?;
            write_section(f, section)?;
        }
        writeln!(f)?;

        writeln!(f, "NEXT STEPS")?;
        writeln!(f, "==========")?;
        if r.rejected_pages > 0 {
            writeln!(
                f,
                "- Please review and address feedback for {} page(s) requiring changes",
                r.rejected_pages
            )?;
            writeln!(f, "- Resubmit updated content for approval")?;
        } else if r.pending_pages > 0 {
            writeln!(f, "- {} page(s) are currently under review", r.pending_pages)?;
            writeln!(f, "- You will be notified once review is complete")?;
        } else {
            writeln!(f, "- All pages have been approved")?;
            writeln!(f, "- Project is ready to proceed to design phase")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "For questions or clarification on any feedback items, please contact your project manager."
        )?;
        writeln!(f)?;
        writeln!(f, "---")?;
        write!(
            f,
            "This report was automatically generated by XeeTrack Project Management System"
        )
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, section: &ReportSection) -> fmt::Result {
    writeln!(
        f,
        "{} (Page {})",
        section.page_title.to_uppercase(),
        section.page_number
    )?;
    writeln!(f, "{}", "=".repeat(section.page_title.len() + 10))?;
    writeln!(
        f,
        "Status: {}",
        section.approval_status.as_str().to_uppercase()
    )?;
    writeln!(f, "Last Updated: {}", section.last_updated.format(DATE_FMT))?;

    for (heading, comments) in [
        ("MANAGEMENT FEEDBACK:", &section.manager_comments),
        ("DESIGN TEAM FEEDBACK:", &section.employee_comments),
    ] {
        if comments.is_empty() {
            continue;
        }
        writeln!(f)?;
        writeln!(f, "{heading}")?;
        for (i, c) in comments.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, c.text)?;
            writeln!(f, "   - By: {}", c.author_name)?;
            writeln!(f, "   - Date: {}", c.created_at.format(DATE_FMT))?;
            writeln!(
                f,
                "   - Status: {}",
                if c.marked_done { "RESOLVED" } else { "PENDING" }
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, day, 9, 30, 0).unwrap()
    }

    fn comment(text: &str, role: Role, done: bool) -> ReportComment {
        ReportComment {
            text: text.into(),
            author_name: match role {
                Role::Manager => "Arjun".into(),
                Role::Employee => "Rakesh".into(),
                Role::Client => "Priya".into(),
            },
            author_role: role,
            marked_done: done,
            created_at: at(4),
        }
    }

    fn page(n: i32, status: ApprovalStatus, comments: Vec<ReportComment>) -> ReportPage {
        ReportPage {
            page_number: n,
            approval_status: status,
            updated_at: at(5),
            comments,
        }
    }

    fn sample() -> FeedbackReport {
        FeedbackReport::build(
            "Priya",
            BrochureStatus::ReadyForDesign,
            at(1),
            at(6),
            vec![
                page(
                    1,
                    ApprovalStatus::Approved,
                    vec![comment("Page has been approved by Arjun", Role::Manager, false)],
                ),
                page(2, ApprovalStatus::Pending, vec![]),
                page(
                    3,
                    ApprovalStatus::Rejected,
                    vec![
                        comment("Page requires changes - Arjun: fix heading", Role::Manager, false),
                        comment("Swapped the hero image", Role::Employee, true),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn summary_counts() {
        let r = sample();
        assert_eq!(r.project_name, "Priya's Brochure Project");
        assert_eq!(r.total_pages, 3);
        assert_eq!(r.approved_pages, 1);
        assert_eq!(r.pending_pages, 1);
        assert_eq!(r.rejected_pages, 1);
        assert_eq!(r.completion_percentage, 33);
        assert_eq!(r.total_feedback_items, 3);
        assert_eq!(r.manager_feedback_items, 2);
        assert_eq!(r.employee_feedback_items, 1);
    }

    #[test]
    fn only_commented_pages_get_sections() {
        let r = sample();
        let numbers: Vec<_> = r.sections.iter().map(|s| s.page_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(r.sections[0].page_title, "Project Details & Company Overview");
        assert_eq!(r.sections[1].page_title, "Content Section 1");
    }

    #[test]
    fn renders_template() {
        let text = sample().render_text(at(7));
        assert!(text.starts_with("BROCHURE PROJECT FEEDBACK REPORT\n"));
        assert!(text.contains("Generated: 2025-03-07 at 09:30:00"));
        assert!(text.contains("Report Period: 2025-03-01 - 2025-03-06"));
        assert!(text.contains("Project Status: READY FOR DESIGN"));
        assert!(text.contains("Completion Progress: 33%"));
        let underline = "=".repeat("Content Section 1".len() + 10);
        assert!(text.contains(&format!("CONTENT SECTION 1 (Page 3)\n{underline}\nStatus: REJECTED")));
        assert!(text.contains("MANAGEMENT FEEDBACK:\n1. Page requires changes - Arjun: fix heading"));
        assert!(text.contains("DESIGN TEAM FEEDBACK:\n1. Swapped the hero image\n   - By: Rakesh"));
        assert!(text.contains("   - Status: RESOLVED"));
        assert!(text.contains("- Please review and address feedback for 1 page(s) requiring changes"));
        assert!(text.ends_with("generated by XeeTrack Project Management System"));
    }

    #[test]
    fn next_steps_when_all_approved() {
        let r = FeedbackReport::build(
            "Priya",
            BrochureStatus::InDesign,
            at(1),
            at(2),
            vec![page(1, ApprovalStatus::Approved, vec![])],
        );
        assert_eq!(r.completion_percentage, 100);
        let text = r.render_text(at(3));
        assert!(text.contains("- All pages have been approved"));
        assert!(!text.contains("MANAGEMENT FEEDBACK:"));
    }

    #[test]
    fn empty_brochure_is_zero_percent() {
        let r = FeedbackReport::build("Priya", BrochureStatus::Draft, at(1), at(1), vec![]);
        assert_eq!(r.completion_percentage, 0);
    }

    #[test]
    fn filename_uses_generation_date() {
        assert_eq!(report_filename(at(9)), "Brochure_Feedback_Report_2025-03-09.txt");
    }
}
