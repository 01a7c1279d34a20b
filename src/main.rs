//! hantel - Fitness training tracker
//!
//! CLI/TUI client for the studio REST backend.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;

use hantel::auth::{self, CredentialStore};
use hantel::config::Config;
use hantel::views::execution::ExecutionView;
use hantel::views::exercises::{ExerciseDetailView, ExerciseListView};
use hantel::views::history::{self, HistoryView};
use hantel::views::plans::{PlanDetailView, PlanListView};
use hantel::views::templates::{TemplateDetailView, TemplateListView};
use hantel::{FitnessApi, HttpFitnessApi};

#[derive(Parser)]
#[command(name = "hantel")]
#[command(author, version, about = "Fitness training tracker - Terminal-Client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Log in against the backend and store the credentials
    Login {
        /// Username (prompted if omitted)
        username: Option<String>,
    },

    /// Clear stored credentials
    Logout,

    /// Manage exercises
    Exercise {
        #[command(subcommand)]
        cmd: ExerciseCmd,
    },

    /// Manage training plans
    Plan {
        #[command(subcommand)]
        cmd: PlanCmd,
    },

    /// Manage session templates
    Template {
        #[command(subcommand)]
        cmd: TemplateCmd,
    },

    /// Run a training session
    Train {
        #[command(subcommand)]
        cmd: TrainCmd,
    },

    /// List completed trainings
    History,
}

#[derive(Subcommand)]
enum ExerciseCmd {
    /// List all exercises
    List,

    /// Create an exercise
    Add {
        name: String,

        /// One of: Gerät, Freihantel, Körpergewicht
        #[arg(short, long)]
        category: String,

        /// Comma-separated muscle groups, e.g. "Chest, Triceps"
        #[arg(short, long)]
        muscles: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit an exercise
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        muscles: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an exercise
    Rm {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PlanCmd {
    /// List all training plans
    List,

    /// Create a plan
    Add { name: String, description: String },

    /// Show a plan with its sessions
    Show { id: i64 },

    /// Edit name/description of a plan
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a plan
    Rm {
        id: i64,

        #[arg(long)]
        yes: bool,
    },

    /// Add a session to a plan
    AddSession {
        plan_id: i64,
        name: String,

        /// Scheduled date, e.g. 2025-03-01
        #[arg(short, long)]
        date: NaiveDate,

        /// Exercise ids to include
        #[arg(short, long, value_delimiter = ',')]
        exercises: Vec<i64>,
    },

    /// Flip a session between GEPLANT and ABGESCHLOSSEN
    ToggleSession { plan_id: i64, session_id: i64 },

    /// Remove a session from a plan
    RmSession {
        plan_id: i64,
        session_id: i64,

        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TemplateCmd {
    /// List all session templates
    List,

    /// Create a session template
    Add {
        name: String,

        #[arg(short, long)]
        plan: Option<i64>,

        /// Position within the plan (1-30)
        #[arg(short, long, default_value = "1")]
        order: i32,
    },

    /// Edit a session template
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        plan: Option<i64>,

        #[arg(short, long)]
        order: Option<i32>,
    },

    /// Delete a session template
    Rm {
        id: i64,

        #[arg(long)]
        yes: bool,
    },

    /// Manage the exercises of one session
    Exercise {
        session_id: i64,

        #[command(subcommand)]
        cmd: TemplateExerciseCmd,
    },
}

#[derive(Subcommand)]
enum TemplateExerciseCmd {
    /// List the exercise templates of the session
    List,

    /// Add an exercise to the session
    Add {
        exercise_id: i64,

        #[arg(short, long, default_value = "3")]
        sets: i32,

        #[arg(short, long, default_value = "10")]
        reps: i32,

        #[arg(short, long, default_value = "0")]
        weight: f64,

        #[arg(short, long)]
        order: Option<i32>,
    },

    /// Edit an exercise template
    Edit {
        template_id: i64,

        #[arg(long)]
        exercise_id: Option<i64>,

        #[arg(short, long)]
        sets: Option<i32>,

        #[arg(short, long)]
        reps: Option<i32>,

        #[arg(short, long)]
        weight: Option<f64>,

        #[arg(short, long)]
        order: Option<i32>,
    },

    /// Remove an exercise from the session
    Rm {
        template_id: i64,

        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TrainCmd {
    /// Start a training from a session template
    Start { template_id: i64 },

    /// Show a session log with its execution rows
    Show { log_id: i64 },

    /// Save one execution row
    Save {
        log_id: i64,
        execution_id: i64,

        #[arg(short, long)]
        sets: Option<i32>,

        #[arg(short, long)]
        reps: Option<i32>,

        #[arg(short, long)]
        weight: Option<f64>,

        #[arg(short, long)]
        completed: bool,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Complete the training (terminal, after confirmation)
    Complete {
        log_id: i64,

        #[arg(long)]
        yes: bool,
    },

    /// Abort and delete the in-progress training
    Abort {
        log_id: i64,

        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let store = CredentialStore::new(config.auth_file.clone());
    let api: Arc<dyn FitnessApi> = Arc::new(HttpFitnessApi::new(&config, store.clone())?);

    match cli.command {
        Some(Commands::Tui) | None => {
            let handle = Handle::current();
            tokio::task::block_in_place(move || {
                let mut app = hantel::tui::App::new(api, handle);
                app.run()
            })?;
        }

        Some(Commands::Login { username }) => {
            let username = match username {
                Some(name) => name,
                None => prompt("Benutzername")?,
            };
            let password = prompt("Passwort")?;
            match auth::login(api.as_ref(), &store, &username, &password).await {
                Ok(()) => println!("Angemeldet als {username}"),
                Err(err) => bail!(err.login_message()),
            }
        }

        Some(Commands::Logout) => {
            auth::logout(&store)?;
            println!("Abgemeldet.");
        }

        Some(Commands::Exercise { cmd }) => run_exercise(api, cmd).await?,
        Some(Commands::Plan { cmd }) => run_plan(api, cmd).await?,
        Some(Commands::Template { cmd }) => run_template(api, cmd).await?,
        Some(Commands::Train { cmd }) => run_train(api, cmd).await?,

        Some(Commands::History) => {
            let mut view = HistoryView::new(api);
            view.load().await;
            check(&view.error_message)?;

            println!("Abgeschlossene Trainings:");
            println!("{:-<60}", "");
            for log in &view.history {
                println!(
                    "{} | {:25} | {}",
                    history::format_date(&log.start_time),
                    log.session_name,
                    history::duration_label(&log.start_time, log.end_time.as_ref()),
                );
            }
        }
    }

    Ok(())
}

async fn run_exercise(api: Arc<dyn FitnessApi>, cmd: ExerciseCmd) -> Result<()> {
    match cmd {
        ExerciseCmd::List => {
            let mut view = ExerciseListView::new(api);
            view.load().await;
            check(&view.error_message)?;

            println!("{:<6} {:<28} {:<16} Muskelgruppen", "ID", "Name", "Kategorie");
            println!("{:-<70}", "");
            for ex in &view.exercises {
                println!(
                    "{:<6} {:<28} {:<16} {}",
                    ex.id,
                    ex.name,
                    ex.category,
                    ex.muscle_groups.join(", ")
                );
            }
        }

        ExerciseCmd::Add {
            name,
            category,
            muscles,
            description,
        } => {
            let mut view = ExerciseListView::new(api);
            view.form.name = name;
            view.form.category = category;
            view.form.muscle_groups_input = muscles;
            view.form.description = description.unwrap_or_default();

            if !view.create().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        ExerciseCmd::Edit {
            id,
            name,
            category,
            muscles,
            description,
        } => {
            let mut view = ExerciseDetailView::new(api, id);
            view.load().await;
            check(&view.error_message)?;

            if let Some(name) = name {
                view.form.name = name;
            }
            if let Some(category) = category {
                view.form.category = category;
            }
            if let Some(muscles) = muscles {
                view.form.muscle_groups_input = muscles;
            }
            if let Some(description) = description {
                view.form.description = description;
            }

            if !view.save().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        ExerciseCmd::Rm { id, yes } => {
            let mut view = ExerciseListView::new(api);
            view.load().await;
            check(&view.error_message)?;
            let Some(exercise) = view.exercises.iter().find(|e| e.id == id).cloned() else {
                bail!("Übung {id} nicht gefunden");
            };

            let confirmed =
                yes || confirm(&format!("Übung \"{}\" wirklich löschen?", exercise.name))?;
            view.delete(&exercise, confirmed).await;
            check(&view.error_message)?;
            if confirmed {
                println!("{}", view.success_message);
            }
        }
    }
    Ok(())
}

async fn run_plan(api: Arc<dyn FitnessApi>, cmd: PlanCmd) -> Result<()> {
    match cmd {
        PlanCmd::List => {
            let mut view = PlanListView::new(api);
            view.load().await;
            check(&view.error_message)?;

            println!("{:<6} {:<28} {:<10} Beschreibung", "ID", "Name", "Sessions");
            println!("{:-<70}", "");
            for plan in &view.plans {
                println!(
                    "{:<6} {:<28} {:<10} {}",
                    plan.id, plan.name, plan.session_count, plan.description
                );
            }
        }

        PlanCmd::Add { name, description } => {
            let mut view = PlanListView::new(api);
            view.form.name = name;
            view.form.description = description;

            if !view.create().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        PlanCmd::Show { id } => {
            let mut view = PlanDetailView::new(api, id);
            view.load().await;
            check(&view.error_message)?;
            let Some(plan) = &view.plan else {
                bail!("Plan {id} nicht gefunden");
            };

            println!("Plan {}: {}", plan.id, plan.name);
            println!("{}", plan.description);
            println!();
            if !plan.has_sessions {
                println!("{}", plan.sessions_hint);
            } else {
                println!("{:<6} {:<28} {:<12} {:<14} Übungen", "ID", "Name", "Datum", "Status");
                println!("{:-<75}", "");
                for session in &plan.sessions {
                    println!(
                        "{:<6} {:<28} {:<12} {:<14} {}",
                        session.id,
                        session.name,
                        session
                            .scheduled_date
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        session.status.map(|s| s.label()).unwrap_or("-"),
                        session.exercise_count,
                    );
                }
            }
        }

        PlanCmd::Edit {
            id,
            name,
            description,
        } => {
            let mut view = PlanDetailView::new(api, id);
            view.load().await;
            check(&view.error_message)?;

            if let Some(name) = name {
                view.edit_form.name = name;
            }
            if let Some(description) = description {
                view.edit_form.description = description;
            }

            if !view.save_changes().await {
                bail_form(&view.edit_form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        PlanCmd::Rm { id, yes } => {
            let mut view = PlanListView::new(api);
            view.load().await;
            check(&view.error_message)?;
            let Some(plan) = view.plans.iter().find(|p| p.id == id).cloned() else {
                bail!("Plan {id} nicht gefunden");
            };

            let confirmed = yes || confirm(&format!("Plan \"{}\" löschen?", plan.name))?;
            view.delete(&plan, confirmed).await;
            check(&view.error_message)?;
            if confirmed {
                println!("{}", view.success_message);
            }
        }

        PlanCmd::AddSession {
            plan_id,
            name,
            date,
            exercises,
        } => {
            let mut view = PlanDetailView::new(api, plan_id);
            view.load().await;
            check(&view.error_message)?;

            view.session_form.name = name;
            view.session_form.scheduled_date = Some(date);
            view.session_form.exercise_ids = exercises;

            if !view.add_session().await {
                bail_form(&view.session_form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        PlanCmd::ToggleSession {
            plan_id,
            session_id,
        } => {
            let mut view = PlanDetailView::new(api, plan_id);
            view.load().await;
            check(&view.error_message)?;
            let Some(session) = find_session(&view, session_id)? else {
                bail!("Session {session_id} nicht gefunden");
            };

            view.toggle_status(&session).await;
            check(&view.error_message)?;
            println!("Status geändert.");
        }

        PlanCmd::RmSession {
            plan_id,
            session_id,
            yes,
        } => {
            let mut view = PlanDetailView::new(api, plan_id);
            view.load().await;
            check(&view.error_message)?;
            let Some(session) = find_session(&view, session_id)? else {
                bail!("Session {session_id} nicht gefunden");
            };

            let confirmed = yes || confirm(&format!("Session \"{}\" wirklich löschen?", session.name))?;
            view.delete_session(&session, confirmed).await;
            check(&view.error_message)?;
            if confirmed {
                println!("Session gelöscht.");
            }
        }
    }
    Ok(())
}

fn find_session(
    view: &PlanDetailView,
    session_id: i64,
) -> Result<Option<hantel::models::TrainingSessionSummary>> {
    let Some(plan) = &view.plan else {
        bail!("Plan nicht geladen");
    };
    Ok(plan.sessions.iter().find(|s| s.id == session_id).cloned())
}

async fn run_template(api: Arc<dyn FitnessApi>, cmd: TemplateCmd) -> Result<()> {
    match cmd {
        TemplateCmd::List => {
            let mut view = TemplateListView::new(api);
            view.load_sessions().await;
            check(&view.error_message)?;

            println!(
                "{:<6} {:<28} {:<20} {:<12} Übungen",
                "ID", "Name", "Plan", "Reihenfolge"
            );
            println!("{:-<75}", "");
            for session in &view.sessions {
                println!(
                    "{:<6} {:<28} {:<20} {:<12} {}",
                    session.id,
                    session.name,
                    session.plan_name,
                    session.order_index,
                    session.exercise_count,
                );
            }
        }

        TemplateCmd::Add { name, plan, order } => {
            let mut view = TemplateListView::new(api);
            view.form.name = name;
            view.form.plan_id = plan;
            view.form.order_index = order;

            if !view.create().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        TemplateCmd::Edit {
            id,
            name,
            plan,
            order,
        } => {
            let mut view = TemplateListView::new(api);
            view.load_sessions().await;
            check(&view.error_message)?;
            let Some(session) = view.sessions.iter().find(|s| s.id == id).cloned() else {
                bail!("Session-Vorlage {id} nicht gefunden");
            };

            view.start_edit(&session);
            if let Some(name) = name {
                view.form.name = name;
            }
            if let Some(plan) = plan {
                view.form.plan_id = Some(plan);
            }
            if let Some(order) = order {
                view.form.order_index = order;
            }

            if !view.update().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        TemplateCmd::Rm { id, yes } => {
            let mut view = TemplateListView::new(api);
            view.load_sessions().await;
            check(&view.error_message)?;
            let Some(session) = view.sessions.iter().find(|s| s.id == id).cloned() else {
                bail!("Session-Vorlage {id} nicht gefunden");
            };

            let confirmed = yes
                || confirm(&format!(
                    "Möchten Sie die Session-Vorlage \"{}\" wirklich löschen?",
                    session.name
                ))?;
            view.delete(&session, confirmed).await;
            check(&view.error_message)?;
            if confirmed {
                println!("{}", view.success_message);
            }
        }

        TemplateCmd::Exercise { session_id, cmd } => {
            run_template_exercise(api, session_id, cmd).await?;
        }
    }
    Ok(())
}

async fn run_template_exercise(
    api: Arc<dyn FitnessApi>,
    session_id: i64,
    cmd: TemplateExerciseCmd,
) -> Result<()> {
    let mut view = TemplateDetailView::new(api, session_id);
    view.load_templates().await;
    check(&view.error_message)?;

    match cmd {
        TemplateExerciseCmd::List => {
            println!(
                "{:<6} {:<28} {:<8} {:<8} {:<10} Reihenfolge",
                "ID", "Übung", "Sätze", "Wdh.", "Gewicht"
            );
            println!("{:-<75}", "");
            for t in &view.templates {
                println!(
                    "{:<6} {:<28} {:<8} {:<8} {:<10} {}",
                    t.id, t.exercise_name, t.planned_sets, t.planned_reps, t.planned_weight, t.order_index,
                );
            }
        }

        TemplateExerciseCmd::Add {
            exercise_id,
            sets,
            reps,
            weight,
            order,
        } => {
            view.start_create();
            view.form.exercise_id = Some(exercise_id);
            view.form.planned_sets = sets;
            view.form.planned_reps = reps;
            view.form.planned_weight = weight;
            if let Some(order) = order {
                view.form.order_index = order;
            }

            if !view.save().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        TemplateExerciseCmd::Edit {
            template_id,
            exercise_id,
            sets,
            reps,
            weight,
            order,
        } => {
            let Some(template) = view.templates.iter().find(|t| t.id == template_id).cloned()
            else {
                bail!("Vorlage {template_id} nicht gefunden");
            };

            view.edit(&template);
            if let Some(exercise_id) = exercise_id {
                view.form.exercise_id = Some(exercise_id);
            }
            if let Some(sets) = sets {
                view.form.planned_sets = sets;
            }
            if let Some(reps) = reps {
                view.form.planned_reps = reps;
            }
            if let Some(weight) = weight {
                view.form.planned_weight = weight;
            }
            if let Some(order) = order {
                view.form.order_index = order;
            }

            if !view.save().await {
                bail_form(&view.form.errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        TemplateExerciseCmd::Rm { template_id, yes } => {
            let Some(template) = view.templates.iter().find(|t| t.id == template_id).cloned()
            else {
                bail!("Vorlage {template_id} nicht gefunden");
            };

            let confirmed = yes
                || confirm(&format!(
                    "Übung \"{}\" wirklich aus der Session entfernen?",
                    template.exercise_name
                ))?;
            view.delete(&template, confirmed).await;
            check(&view.error_message)?;
            if confirmed {
                println!("Übung entfernt.");
            }
        }
    }
    Ok(())
}

async fn run_train(api: Arc<dyn FitnessApi>, cmd: TrainCmd) -> Result<()> {
    let mut view = ExecutionView::new(api);

    match cmd {
        TrainCmd::Start { template_id } => {
            view.start(template_id).await;
            check(&view.error_message)?;
            print_log(&view);
        }

        TrainCmd::Show { log_id } => {
            view.resume(log_id).await;
            check(&view.error_message)?;
            print_log(&view);
        }

        TrainCmd::Save {
            log_id,
            execution_id,
            sets,
            reps,
            weight,
            completed,
            notes,
        } => {
            view.resume(log_id).await;
            check(&view.error_message)?;

            let Some(form) = view.forms.get_mut(&execution_id) else {
                bail!("Execution {execution_id} nicht gefunden");
            };
            if let Some(sets) = sets {
                form.actual_sets = sets;
            }
            if let Some(reps) = reps {
                form.actual_reps = reps;
            }
            if let Some(weight) = weight {
                form.actual_weight = weight;
            }
            if completed {
                form.completed = true;
            }
            if let Some(notes) = notes {
                form.notes = notes;
            }

            if !view.save_execution(execution_id).await {
                let errors = view
                    .forms
                    .get(&execution_id)
                    .map(|f| f.errors.clone())
                    .unwrap_or_default();
                bail_form(&errors, &view.error_message)?;
            }
            println!("{}", view.success_message);
        }

        TrainCmd::Complete { log_id, yes } => {
            view.resume(log_id).await;
            check(&view.error_message)?;

            let confirmed = yes
                || confirm("Training wirklich abschließen? Danach sind keine Änderungen mehr möglich.")?;
            if view.complete(confirmed).await {
                println!("{}", view.success_message);
            } else {
                check(&view.error_message)?;
            }
        }

        TrainCmd::Abort { log_id, yes } => {
            view.resume(log_id).await;
            check(&view.error_message)?;

            let confirmed = yes || confirm("Laufendes Training wirklich abbrechen und löschen?")?;
            if view.abort(confirmed).await {
                println!("Training abgebrochen und gelöscht.");
            } else {
                check(&view.error_message)?;
            }
        }
    }
    Ok(())
}

fn print_log(view: &ExecutionView) {
    let Some(log) = &view.log else {
        return;
    };

    println!(
        "Log {}: {} ({})",
        log.id,
        log.session_name,
        match log.status {
            hantel::models::LogStatus::InProgress => "läuft",
            hantel::models::LogStatus::Completed => "abgeschlossen",
        }
    );
    println!("Gestartet: {}", history::format_date(&log.start_time));
    println!();
    println!(
        "{:<8} {:<28} {:<14} {:<14} Fertig",
        "ID", "Übung", "Geplant", "Ist"
    );
    println!("{:-<75}", "");
    for exec in &log.executions {
        let id_label = if exec.is_placeholder() {
            format!("{}*", exec.id)
        } else {
            exec.id.to_string()
        };
        println!(
            "{:<8} {:<28} {:<14} {:<14} {}",
            id_label,
            exec.exercise_name,
            format!("{}x{} {}kg", exec.planned_sets, exec.planned_reps, exec.planned_weight),
            format!("{}x{} {}kg", exec.actual_sets, exec.actual_reps, exec.actual_weight),
            if exec.completed { "ja" } else { "nein" },
        );
    }
    if log.executions.iter().any(|e| e.is_placeholder()) {
        println!();
        println!("* Vorschau aus den Vorlagen, noch nicht vom Server übernommen");
    }
}

/// y/N prompt for destructive actions
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [j/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "j" | "ja" | "y" | "yes"
    ))
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut value = String::new();
    std::io::stdin().lock().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Bail with the view's banner message, if any
fn check(error_message: &str) -> Result<()> {
    if error_message.is_empty() {
        Ok(())
    } else {
        bail!("{error_message}");
    }
}

/// Report form validation errors, or the banner message
fn bail_form(errors: &hantel::forms::FormErrors, error_message: &str) -> Result<()> {
    if !errors.is_empty() {
        eprintln!("Eingaben ungültig:");
        for (control, _kind, message) in errors.iter() {
            eprintln!("  {control}: {message}");
        }
        bail!("Eingaben ungültig");
    }
    check(error_message)?;
    bail!("Aktion fehlgeschlagen");
}
