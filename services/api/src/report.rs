use crate::infra::InMemoryScoreStore;
use chrono::Utc;
use clap::{Args, Subcommand};
use placement_dss::config::AppConfig;
use placement_dss::error::AppError;
use placement_dss::matching::weights::from_csv_reader;
use placement_dss::matching::{
    InternshipProfile, MatchScore, MatchService, RankedMatches, StudentProfile, Weight,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum RankCommand {
    /// Rank internship postings for one student
    Internships(RankInternshipsArgs),
    /// Rank applicants for one internship posting
    Students(RankStudentsArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RankInternshipsArgs {
    /// JSON document holding the student profile
    #[arg(long)]
    pub(crate) student: PathBuf,
    /// JSON array of internship profiles to rank
    #[arg(long)]
    pub(crate) internships: PathBuf,
    #[command(flatten)]
    pub(crate) options: RankOptions,
}

#[derive(Args, Debug)]
pub(crate) struct RankStudentsArgs {
    /// JSON document holding the internship profile
    #[arg(long)]
    pub(crate) internship: PathBuf,
    /// JSON array of student profiles to rank
    #[arg(long)]
    pub(crate) students: PathBuf,
    #[command(flatten)]
    pub(crate) options: RankOptions,
}

#[derive(Args, Debug)]
pub(crate) struct RankOptions {
    /// Weights CSV export with `name,weight,is_active` columns
    #[arg(long)]
    pub(crate) weights: PathBuf,
    /// Keep only the best N matches
    #[arg(long)]
    pub(crate) top_k: Option<usize>,
    /// Print the ranked scores as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CriteriaArgs {
    /// Print the criterion names as a JSON array
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(command: RankCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(InMemoryScoreStore::default());
    let service = MatchService::new(store, &config.matching)?;

    let (title, candidates, matches, json) = match command {
        RankCommand::Internships(args) => {
            let student: StudentProfile = read_json(&args.student)?;
            let internships: Vec<InternshipProfile> = read_json(&args.internships)?;
            let weights = read_weights(&args.options.weights)?;
            let matches =
                service.match_internships(&student, &internships, &weights, args.options.top_k)?;
            let title = format!("Internship ranking for {}", student.id);
            (title, internships.len(), matches, args.options.json)
        }
        RankCommand::Students(args) => {
            let internship: InternshipProfile = read_json(&args.internship)?;
            let students: Vec<StudentProfile> = read_json(&args.students)?;
            let weights = read_weights(&args.options.weights)?;
            let matches =
                service.match_students(&internship, &students, &weights, args.options.top_k)?;
            let title = format!("Applicant ranking for {}", internship.id);
            (title, students.len(), matches, args.options.json)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        print!("{}", render_ranking(&title, candidates, &matches));
    }

    Ok(())
}

pub(crate) fn run_criteria_listing(args: CriteriaArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = MatchService::new(Arc::new(InMemoryScoreStore::default()), &config.matching)?;
    let names = service.criteria();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    println!("Registered criteria (evaluation order)");
    for (position, name) in names.iter().enumerate() {
        println!("  {}. {}", position + 1, name);
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_weights(path: &Path) -> Result<Vec<Weight>, AppError> {
    let file = File::open(path)?;
    Ok(from_csv_reader(file)?)
}

/// Plain-text table of ranked matches, one column per criterion sub-score.
pub(crate) fn render_ranking(title: &str, candidates: usize, matches: &RankedMatches) -> String {
    let generated = Utc::now().format("%Y-%m-%d %H:%M UTC");
    let mut out = format!(
        "{title} ({} of {candidates} candidates, generated {generated})\n",
        matches.scores.len()
    );

    let Some(first) = matches.scores.first() else {
        out.push_str("  no matches\n");
        return out;
    };

    let criteria: Vec<&str> = first
        .details
        .iter()
        .map(|detail| detail.criterion.as_str())
        .collect();

    out.push_str(&format!("  {:>3}  {:<16} {:>7}", "#", "candidate", "score"));
    for name in &criteria {
        out.push_str(&format!("  {name:>18}"));
    }
    out.push('\n');

    for (position, score) in matches.scores.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {:<16} {:>7.2}",
            position + 1,
            candidate_label(score),
            score.score
        ));
        for name in &criteria {
            let cell = match score.detail(name) {
                Some(detail) => format!("  {:>18.2}", detail.subscore),
                None => format!("  {:>18}", "-"),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out.push_str(&format!("Persisted snapshots: {}\n", matches.persisted));
    out
}

fn candidate_label(score: &MatchScore) -> String {
    format!("{} / {}", score.student_id, score.internship_id)
}
