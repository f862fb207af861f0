use std::sync::Arc;

use anyhow::Context;
use futures::{StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use form_wizard::config::WizardConfig;
use form_wizard::controllers::{
    Mount, PersonalInfoController, PreferencesController, ReviewController, ReviewStatus,
};
use form_wizard::guard::spawn_guard_watch;
use form_wizard::navigation::{NavigationOutcome, Navigator, Router};
use form_wizard::store::{FormStore, open_storage};
use form_wizard::submission::{SimulatedSubmitter, Submitter};
use form_wizard::wizard::validation::ValidationErrors;
use form_wizard::wizard::{
    Interest, NotificationPreference, Occupation, Route, ThemePreference, progress,
};

/// The view currently mounted in the terminal.
enum Page {
    Home,
    PersonalInfo(PersonalInfoController),
    Preferences(PreferencesController),
    Review(Arc<ReviewController>),
}

impl Page {
    fn route(&self) -> Route {
        match self {
            Self::Home => Route::Home,
            Self::PersonalInfo(_) => Route::PersonalInfo,
            Self::Preferences(_) => Route::Preferences,
            Self::Review(_) => Route::Review,
        }
    }
}

struct Host {
    store: Arc<FormStore>,
    router: Arc<Router>,
    submitter: Arc<dyn Submitter>,
    page: Page,
}

impl Host {
    /// Mount whatever view the router says is active.
    async fn sync(&mut self) {
        loop {
            let route = self.router.current().await;
            if route == self.page.route() {
                return;
            }
            let navigator: Arc<dyn Navigator> = self.router.clone();
            let mounted = match route {
                Route::Home => Some(Page::Home),
                Route::PersonalInfo => Some(Page::PersonalInfo(
                    PersonalInfoController::mount(self.store.clone(), navigator).await,
                )),
                Route::Preferences => {
                    match PreferencesController::mount(self.store.clone(), navigator).await {
                        Mount::Ready(ctrl) => Some(Page::Preferences(ctrl)),
                        Mount::Redirected(outcome) => {
                            report_navigation(&outcome);
                            None
                        }
                    }
                }
                Route::Review => {
                    match ReviewController::mount(
                        self.store.clone(),
                        navigator,
                        self.submitter.clone(),
                    )
                    .await
                    {
                        Mount::Ready(ctrl) => Some(Page::Review(Arc::new(ctrl))),
                        Mount::Redirected(outcome) => {
                            report_navigation(&outcome);
                            None
                        }
                    }
                }
            };
            if let Some(page) = mounted {
                self.page = page;
            }
        }
    }

    async fn render(&self) {
        println!();
        if self.page.route() != Route::Home {
            let completed = self.store.completed_steps().await;
            let bar: Vec<String> = progress(self.page.route(), &completed)
                .iter()
                .map(|item| {
                    let mark = if item.completed {
                        "✓"
                    } else if item.active {
                        "•"
                    } else {
                        " "
                    };
                    format!("[{}{} {}]", item.number, mark, item.label)
                })
                .collect();
            println!("{}", bar.join(" ── "));
        }

        match &self.page {
            Page::Home => {
                println!("Multi-Step Form Wizard");
                println!("  Type 'start' to begin or continue where you left off.");
            }
            Page::PersonalInfo(ctrl) => {
                let draft = ctrl.draft();
                println!("Personal Information");
                println!("  fullName   = {}", draft.full_name);
                println!("  email      = {}", draft.email);
                let occupations: Vec<&str> = Occupation::ALL.iter().map(|o| o.as_str()).collect();
                println!("  occupation = {} ({})", draft.occupation, occupations.join("|"));
                print_errors(ctrl.errors());
            }
            Page::Preferences(ctrl) => {
                let view = ctrl.view().await;
                println!("Preferences");
                if let Some(occupation) = view.occupation {
                    println!("  As a {occupation}, tell us what you are interested in.");
                }
                let interests: Vec<String> = Interest::ALL
                    .iter()
                    .map(|i| {
                        let mark = if view.draft.is_selected(*i) { "x" } else { " " };
                        format!("[{mark}] {i}")
                    })
                    .collect();
                println!("  interests: {}", interests.join("  "));
                let offered: Vec<&str> =
                    NotificationPreference::OFFERED.iter().map(|n| n.as_str()).collect();
                let themes: Vec<&str> = ThemePreference::ALL.iter().map(|t| t.as_str()).collect();
                println!(
                    "  notificationPreference = {} ({})",
                    view.draft.notification_preference,
                    offered.join("|")
                );
                println!(
                    "  themePreference        = {} ({})",
                    view.draft.theme_preference,
                    themes.join("|")
                );
                if view.show_student_options {
                    println!(
                        "  student options: discounts={} educationalResources={}",
                        view.student_options.discounts, view.student_options.educational_resources
                    );
                }
                print_errors(ctrl.errors());
            }
            Page::Review(ctrl) => {
                println!("Review");
                match ctrl.summary().await {
                    Some(summary) => {
                        for (label, value) in summary.rows() {
                            println!("  {label:<14} {value}");
                        }
                    }
                    None => println!("  (no data)"),
                }
                match ctrl.status().await {
                    ReviewStatus::Ready => println!("  Type 'submit' to send."),
                    ReviewStatus::Submitting => println!("  Submitting…"),
                    ReviewStatus::Submitted(receipt) => {
                        println!("  ✅ Submitted (reference {})", receipt.id);
                        println!("  Type 'start-over' to begin again.");
                    }
                }
            }
        }
    }

    /// Handle one input line. Returns false when the session should end.
    async fn handle(&mut self, line: &str) -> bool {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => return false,
            "help" => print_help(),
            "start" => {
                let resume = self.store.snapshot().await.resume_route();
                report_navigation(&self.router.navigate(resume).await);
            }
            "go" => {
                report_navigation(&self.router.navigate_path(arg).await);
            }
            "reset" => {
                self.store.reset().await;
                eprintln!("ℹ️  Form cleared");
                if let Some(outcome) = self.router.recheck().await {
                    report_navigation(&outcome);
                }
            }
            "reload" => {
                if self.store.reload().await {
                    eprintln!("ℹ️  Picked up changes from storage");
                }
                if let Some(outcome) = self.router.recheck().await {
                    report_navigation(&outcome);
                }
            }
            "back" => {
                let outcome = match &self.page {
                    Page::Preferences(ctrl) => Some(ctrl.back().await),
                    Page::Review(ctrl) => {
                        let outcome = ctrl.back().await;
                        if outcome.is_none() {
                            eprintln!("Back is unavailable once submission has started");
                        }
                        outcome
                    }
                    Page::PersonalInfo(_) => Some(self.router.navigate(Route::Home).await),
                    Page::Home => None,
                };
                if let Some(outcome) = outcome {
                    report_navigation(&outcome);
                }
            }
            "toggle" => match &mut self.page {
                Page::Preferences(ctrl) => {
                    ctrl.toggle_interest(arg);
                }
                _ => eprintln!("Nothing to toggle here"),
            },
            "discounts" | "educational-resources" => match &mut self.page {
                Page::Preferences(ctrl) => {
                    let options = ctrl.student_options_mut();
                    if command == "discounts" {
                        options.discounts = !options.discounts;
                    } else {
                        options.educational_resources = !options.educational_resources;
                    }
                }
                _ => eprintln!("Student options are on the preferences page"),
            },
            "submit" => self.submit().await,
            "start-over" => match &self.page {
                Page::Review(ctrl) => report_navigation(&ctrl.start_over().await),
                _ => eprintln!("start-over is available on the review page"),
            },
            _ => match line.split_once('=') {
                Some((field, value)) => {
                    let accepted = match &mut self.page {
                        Page::PersonalInfo(ctrl) => ctrl.set_field(field.trim(), value.trim()),
                        Page::Preferences(ctrl) => ctrl.set_field(field.trim(), value.trim()),
                        _ => false,
                    };
                    if !accepted {
                        eprintln!("Unknown field '{}'", field.trim());
                    }
                }
                None => eprintln!("Unknown command '{command}'. Type 'help'."),
            },
        }

        self.sync().await;
        self.render().await;
        true
    }

    async fn submit(&mut self) {
        match &mut self.page {
            Page::Home => eprintln!("Type 'start' to begin"),
            Page::PersonalInfo(ctrl) => report_submit(ctrl.submit().await),
            Page::Preferences(ctrl) => report_submit(ctrl.submit().await),
            Page::Review(ctrl) => {
                eprintln!("⏳ Submitting…");
                match ctrl.submit().await {
                    Ok(receipt) => eprintln!("✅ Submitted ({})", receipt.id),
                    Err(e) => eprintln!("❌ {e}"),
                }
            }
        }
    }
}

fn report_submit(result: Result<NavigationOutcome, ValidationErrors>) {
    match result {
        Ok(outcome) => report_navigation(&outcome),
        Err(errors) => eprintln!("❌ {errors}"),
    }
}

fn report_navigation(outcome: &NavigationOutcome) {
    match outcome {
        NavigationOutcome::Rendered(_) => {}
        NavigationOutcome::Redirected { requested, hops } => {
            if let Some(to) = hops.last() {
                eprintln!("↩️  {requested} is not available yet, showing {to}");
            }
        }
        NavigationOutcome::NotFound(path) => eprintln!("No page at '{path}'"),
    }
}

fn print_errors(errors: Option<&ValidationErrors>) {
    if let Some(errors) = errors {
        for error in &errors.errors {
            println!("  ! {}: {}", error.field, error.message);
        }
    }
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  start                 begin, or resume at the first unfinished step");
    eprintln!("  field=value           edit a field on the current step");
    eprintln!("  toggle <interest>     toggle an interest (preferences)");
    eprintln!("  discounts             toggle student discounts (preferences)");
    eprintln!("  educational-resources toggle student resources (preferences)");
    eprintln!("  submit                submit the current step");
    eprintln!("  back                  previous step");
    eprintln!("  go <path>             navigate to a path, e.g. /steps/review");
    eprintln!("  start-over            clear everything after review");
    eprintln!("  reset                 clear all form data");
    eprintln!("  reload                re-read saved progress from storage");
    eprintln!("  quit                  exit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = WizardConfig::from_env().context("invalid configuration")?;

    eprintln!("📝 Form Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Storage: {:?}", config.storage);
    eprintln!("   Type 'help' for commands, 'quit' to exit.");

    let storage = open_storage(&config.storage)
        .await
        .context("failed to open storage")?;
    let store = FormStore::load_with_key(storage, &config.storage_key).await;
    let router = Router::new(store.clone());
    let watcher = spawn_guard_watch(router.clone(), store.clone());

    let mut host = Host {
        store,
        router,
        submitter: Arc::new(SimulatedSubmitter::new(config.submit_delay)),
        page: Page::Home,
    };
    host.render().await;

    let reader = BufReader::new(tokio::io::stdin());
    let mut input = Box::pin(stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }));

    eprint!("> ");
    while let Some(line) = input.next().await {
        let line = line.trim();
        if !line.is_empty() && !host.handle(line).await {
            break;
        }
        eprint!("> ");
    }

    watcher.abort();
    eprintln!("Bye");
    Ok(())
}
