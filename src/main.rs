//! School Results CLI
//!
//! Grade scores and result submissions, and report fee payment status

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use school_results::grading::format_gpa;
use school_results::payment::{load_payments, PaymentState, PaymentSummary, DEFAULT_PAYMENTS_PATH};
use school_results::results::{grade_batch, load_submissions, DEFAULT_ROSTER_PATH};
use school_results::{grade_for, EngineConfig, GradingScale, ResultSubmission, ScaleId, ScoreInput};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "school_results",
    about = "Grade exam results and track fee payment cycles",
    version
)]
struct Cli {
    /// Grading scale: simple (single 0-100 score) or combined (MCQ + CQ)
    #[arg(long, global = true)]
    scale: Option<ScaleId>,

    /// Load scale tables from this directory instead of the built-in ones
    #[arg(long, global = true)]
    scales_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade one subject score
    Grade(GradeArgs),
    /// Grade a JSON result submission and print the graded result
    Result {
        /// Path to the submission JSON
        file: PathBuf,
        /// Reject subjects outside the class curriculum
        #[arg(long)]
        check_curriculum: bool,
    },
    /// Payment status for a single student
    Payment(PaymentArgs),
    /// Batch-grade a marks roster CSV and write a results CSV
    Roster {
        /// Path to the roster CSV
        #[arg(default_value = DEFAULT_ROSTER_PATH)]
        file: PathBuf,
        /// Output CSV path
        #[arg(long, default_value = "results.csv")]
        output: PathBuf,
    },
    /// Payment table with totals for a payments CSV
    Payments {
        #[arg(default_value = DEFAULT_PAYMENTS_PATH)]
        file: PathBuf,
        /// Evaluate as of this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Args, Debug)]
struct GradeArgs {
    /// Single score out of 100
    #[arg(long, conflicts_with_all = ["mcq", "cq"])]
    score: Option<i32>,
    #[arg(long)]
    mcq: Option<i32>,
    #[arg(long, default_value_t = 30)]
    mcq_total: i32,
    #[arg(long)]
    cq: Option<i32>,
    #[arg(long, default_value_t = 70)]
    cq_total: i32,
}

#[derive(Args, Debug)]
struct PaymentArgs {
    /// Last payment date (RFC 3339); omit for a student who has never paid
    #[arg(long)]
    last_paid: Option<DateTime<Utc>>,
    /// Whether the current cycle is paid
    #[arg(long)]
    paid: bool,
    /// Fee amount for the cycle
    #[arg(long, default_value_t = 0.0)]
    amount: f64,
    #[arg(long, default_value_t = 30)]
    cycle_days: u32,
    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = EngineConfig {
        scales_path: cli.scales_dir.clone(),
        ..EngineConfig::default()
    };

    match cli.command {
        Command::Grade(args) => {
            // Single grading defaults to the simple scale
            config.scale = cli.scale.unwrap_or(ScaleId::Simple);
            run_grade(&args, &config.grading_scale()?)
        }
        Command::Result { file, check_curriculum } => {
            config.scale = cli.scale.unwrap_or(config.scale);
            config.check_curriculum = check_curriculum;
            run_result(&file, &config)
        }
        Command::Payment(args) => {
            config.payment.cycle_length_days = args.cycle_days;
            run_payment(&args, &config)
        }
        Command::Roster { file, output } => {
            config.scale = cli.scale.unwrap_or(config.scale);
            run_roster(&file, &output, &config)
        }
        Command::Payments { file, now } => run_payments(&file, now.unwrap_or_else(Utc::now), &config),
    }
}

fn run_grade(args: &GradeArgs, scale: &GradingScale) -> Result<()> {
    let input = match (args.score, args.mcq, args.cq) {
        (Some(score), None, None) => ScoreInput::single(score),
        (None, mcq, cq) if mcq.is_some() || cq.is_some() => {
            ScoreInput::split(mcq.unwrap_or(0), args.mcq_total, cq.unwrap_or(0), args.cq_total)
        }
        _ => bail!("pass either --score or --mcq/--cq"),
    };

    let graded = grade_for(&input, scale)?;
    println!("Scale:      {}", scale.name());
    println!("Obtained:   {} / {}", graded.total_score, input.available());
    println!("Percentage: {:.2}%", graded.percentage);
    println!("Grade:      {}", graded.grade);
    println!("GPA:        {}", format_gpa(graded.gpa));
    Ok(())
}

fn run_result(file: &Path, config: &EngineConfig) -> Result<()> {
    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let submission: ResultSubmission =
        serde_json::from_reader(reader).with_context(|| format!("Invalid submission in {}", file.display()))?;

    let mut registry = config.registry()?;
    let graded = registry.submit(&submission)?;
    println!("{}", serde_json::to_string_pretty(graded)?);
    Ok(())
}

fn run_payment(args: &PaymentArgs, config: &EngineConfig) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let state = PaymentState {
        payment_amount: args.amount,
        has_paid: args.paid,
        last_payment_date: args.last_paid,
        cycle_length_days: config.payment.cycle_length_days,
    };
    let (current, status) = state.assess(now, config.payment.never_paid)?;

    println!("Amount:           {:.2}", current.payment_amount);
    println!("Next payment due: {}", status.next_payment_due.format("%Y-%m-%d"));
    println!("Days left:        {}", status.days_left);
    println!("Status:           {}", if status.is_overdue { "OVERDUE".to_string() } else { current.label().to_string() });
    Ok(())
}

fn run_roster(file: &Path, output: &Path, config: &EngineConfig) -> Result<()> {
    let submissions =
        load_submissions(file).with_context(|| format!("Failed to load roster {}", file.display()))?;
    let scale = config.grading_scale()?;
    println!("Grading {} sittings on the {} scale...", submissions.len(), scale.name());

    let graded = grade_batch(&submissions, &scale);

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record([
        "student_id", "class_name", "semester", "exam_type", "subjects",
        "total_marks", "average_gpa", "overall_grade", "error",
    ])?;

    let mut failures = 0;
    for (submission, result) in submissions.iter().zip(&graded) {
        let head = [
            submission.student_id.clone(),
            submission.class_name.clone(),
            submission.semester.to_string(),
            submission.exam_type().to_string(),
        ];
        match result {
            Ok(graded) => {
                let summary = &graded.summary;
                writer.write_record(head.iter().cloned().chain([
                    summary.subject_count.to_string(),
                    summary.total_marks.to_string(),
                    summary.display_gpa(),
                    summary.overall_grade.to_string(),
                    String::new(),
                ]))?;
            }
            Err(err) => {
                failures += 1;
                log::warn!("student {}: {}", submission.student_id, err);
                writer.write_record(head.iter().cloned().chain([
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    err.to_string(),
                ]))?;
            }
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} results to {} ({} rejected)",
        graded.len() - failures,
        output.display(),
        failures
    );
    Ok(())
}

fn run_payments(file: &Path, now: DateTime<Utc>, config: &EngineConfig) -> Result<()> {
    let payments = load_payments(file).with_context(|| format!("Failed to load payments {}", file.display()))?;

    let rows = payments
        .par_iter()
        .map(|p| {
            let (state, status) = p
                .state
                .assess(now, config.payment.never_paid)
                .with_context(|| format!("Invalid payment record for {}", p.student_id))?;
            Ok((p, state, status))
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{:<12} {:>10} {:>8} {:>12} {:>9} {:>8}", "Student", "Amount", "Status", "Due", "DaysLeft", "Overdue");
    println!("{}", "-".repeat(64));
    for (payment, state, status) in &rows {
        println!(
            "{:<12} {:>10.2} {:>8} {:>12} {:>9} {:>8}",
            payment.student_id,
            state.payment_amount,
            state.label().to_string(),
            status.next_payment_due.format("%Y-%m-%d").to_string(),
            status.days_left,
            if status.is_overdue { "yes" } else { "no" }
        );
    }

    let summary = PaymentSummary::from_states(payments.iter().map(|p| &p.state), now, config.payment.never_paid)?;
    println!("{}", "-".repeat(64));
    println!("{:<12} {:>10.2}", "Total", summary.total_amount);
    println!(
        "{} students: {} paid, {} pending, {} overdue",
        summary.student_count, summary.paid_count, summary.pending_count, summary.overdue_count
    );
    Ok(())
}
