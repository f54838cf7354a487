//! CronJob checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{CronJobHolder, PodTemplateHolder};
use crate::types::{Grade, TestScore};

/// Minimum number of retries before a job is marked as failed.
const MIN_BACKOFF_LIMIT: i32 = 2;

pub fn register(checks: &mut Checks) {
    checks.register(
        "CronJob has deadline",
        "Makes sure that all CronJobs has a configured deadline",
        Evaluator::cron_job(cron_job_has_deadline),
    );
    checks.register(
        "CronJob RestartPolicy",
        "Makes sure CronJobs have a valid RestartPolicy",
        Evaluator::cron_job(cron_job_has_restart_policy),
    );
    checks.register(
        "CronJob Backofflimit",
        "Makes sure CronJobs have a backoffLimit of at least 2",
        Evaluator::cron_job(cron_job_has_backoff_limit),
    );
}

fn cron_job_has_deadline(job: &dyn CronJobHolder, _: &CheckContext<'_>) -> CheckOutcome {
    if job.starting_deadline_seconds().is_some() {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "The CronJob should have startingDeadlineSeconds configured",
        "This makes sure that jobs are automatically cancelled if they can not be scheduled",
    ))
}

fn cron_job_has_restart_policy(job: &dyn CronJobHolder, _: &CheckContext<'_>) -> CheckOutcome {
    const DESCRIPTION: &str = "Valid CronJob RestartPolicy settings are Never or OnFailure";

    let policy = job
        .pod_template()
        .spec
        .restart_policy
        .as_deref()
        .unwrap_or_default();

    let score = match policy {
        "Never" | "OnFailure" => TestScore::new(),
        "" => TestScore::with_grade(Grade::Critical).comment(
            "",
            "The CronJob is missing a valid RestartPolicy",
            DESCRIPTION,
        ),
        _ => TestScore::with_grade(Grade::Critical).comment(
            "",
            "The CronJob must have a valid RestartPolicy configured",
            DESCRIPTION,
        ),
    };
    Ok(score)
}

fn cron_job_has_backoff_limit(job: &dyn CronJobHolder, _: &CheckContext<'_>) -> CheckOutcome {
    let score = match job.backoff_limit() {
        None => TestScore::with_grade(Grade::Critical).comment(
            "",
            "The CronJob should have backoffLimit configured",
            "Set jobTemplate.spec.backoffLimit so failing jobs are retried a bounded number of times",
        ),
        Some(limit) if limit < MIN_BACKOFF_LIMIT => TestScore::with_grade(Grade::Critical).comment(
            "",
            "The CronJob has a backoffLimit below 2",
            "A backoffLimit of at least 2 lets transient failures be retried before the job is marked as failed",
        ),
        Some(_) => TestScore::new(),
    };
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::score_of;

    fn cron_job(deadline: &str, backoff: &str, restart_policy: &str) -> String {
        format!(
            "apiVersion: batch/v1
kind: CronJob
metadata:
  name: report
spec:
  schedule: '0 * * * *'
{deadline}  jobTemplate:
    spec:
{backoff}      template:
        spec:
{restart_policy}          containers:
            - name: report
              image: report:1
"
        )
    }

    #[test]
    fn test_deadline() {
        let without = cron_job("", "", "");
        assert_eq!(score_of(&without, "CronJob has deadline").grade, Grade::Critical);

        let with = cron_job("  startingDeadlineSeconds: 100\n", "", "");
        assert_eq!(score_of(&with, "CronJob has deadline").grade, Grade::AllOk);
    }

    #[test]
    fn test_restart_policy() {
        let missing = score_of(&cron_job("", "", ""), "CronJob RestartPolicy");
        assert_eq!(missing.grade, Grade::Critical);
        assert_eq!(missing.comments[0].summary, "The CronJob is missing a valid RestartPolicy");

        let always = score_of(
            &cron_job("", "", "          restartPolicy: Always\n"),
            "CronJob RestartPolicy",
        );
        assert_eq!(always.grade, Grade::Critical);
        assert_eq!(
            always.comments[0].summary,
            "The CronJob must have a valid RestartPolicy configured"
        );

        for policy in ["Never", "OnFailure"] {
            let yaml = cron_job("", "", &format!("          restartPolicy: {}\n", policy));
            assert_eq!(score_of(&yaml, "CronJob RestartPolicy").grade, Grade::AllOk);
        }
    }

    #[test]
    fn test_backoff_limit() {
        let unset = cron_job("", "", "");
        assert_eq!(score_of(&unset, "CronJob Backofflimit").grade, Grade::Critical);

        let low = cron_job("", "      backoffLimit: 1\n", "");
        assert_eq!(score_of(&low, "CronJob Backofflimit").grade, Grade::Critical);

        let ok = cron_job("", "      backoffLimit: 2\n", "");
        assert_eq!(score_of(&ok, "CronJob Backofflimit").grade, Grade::AllOk);
    }
}
