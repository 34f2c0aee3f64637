//! Tracking-issue composition.
//!
//! One issue document per error class, named by its row index in the
//! sorted class sequence so reruns over identical input produce identical
//! files.

use crate::aggregator::ErrorClass;
use crate::error::TriageError;
use crate::template::{TemplateContext, TemplateEngine};

const ISSUE_TEMPLATE: &str = r#"---
name: Tracking issue
about: Use this template for tracking recurring processing errors.
title: {process_error_message}
labels: {organization},{work_area}
assignees:
---

## issue
The CTD processing tool encountered the following problem which is affecting {count} hakai_ids:
{process_error_message}

!!! notes
    {process_error}


!!! hakai_ids
    {hakai_ids}
"#;

/// A rendered tracking-issue body together with its stable file name.
#[derive(Debug, Clone)]
pub struct IssueDocument {
    pub file_name: String,
    pub body: String,
}

/// Compose the issue document for the class at `index` in the sorted
/// sequence.
pub fn compose(
    class: &ErrorClass,
    index: usize,
    templates: &dyn TemplateEngine,
) -> Result<IssueDocument, TriageError> {
    let ctx = TemplateContext::new()
        .set("organization", class.organization.clone())
        .set("work_area", class.work_area.clone())
        .set("process_error_message", class.display_message.clone())
        .set("count", class.count.to_string())
        .set("process_error", class.representative_error.clone())
        .set("hakai_ids", class.sample_ids.join(", "));
    let body = templates.expand(ISSUE_TEMPLATE, &ctx)?;
    Ok(IssueDocument {
        file_name: format!("issue-{}.md", index),
        body,
    })
}
