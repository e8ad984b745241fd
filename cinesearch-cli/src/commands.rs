//! CLI command implementations

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use cinesearch_core::{
    AuthClient, AuthOutcome, CineSearchConfig, CineSearchError, FavoritesStore, FileStore,
    KeyValueStore, MovieDetail, MovieSummary, SearchHistory, SessionStore,
};
use cinesearch_search::aggregate::{
    load_detail_page, load_featured_carousel, load_sidebar, toggle_favorite,
};
use cinesearch_search::featured::is_featured;
use cinesearch_search::listing::QuickSearch;
use cinesearch_search::{
    AutoAdvance, Carousel, FavoriteError, MovieCatalog, OmdbClient, SearchPhase, SearchSession,
    SearchState, trailer_search_url,
};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by title
    Search {
        /// Title or keywords
        query: String,
        /// Results page, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Run a canned search (action, comedy, drama, horror, popular)
    Quick {
        /// Shortcut to run
        shortcut: QuickSearch,
    },
    /// Show full details of a title
    Details {
        /// IMDb identifier, e.g. tt0111161
        id: String,
    },
    /// Show the featured carousel and sidebar listings
    Featured {
        /// Keep rotating the carousel until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Print a trailer search link for a title
    Trailer {
        /// Movie title
        title: String,
    },
}

/// Favorites subcommands
#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List saved favorites
    List,
    /// Save a title
    Add { id: String },
    /// Remove a title
    Remove { id: String },
    /// Save a title, or remove it if already saved
    Toggle { id: String },
}

/// Services shared by every command.
struct App {
    config: CineSearchConfig,
    catalog: OmdbClient,
    favorites: FavoritesStore,
    history: SearchHistory,
    auth: AuthClient,
}

impl App {
    fn new(config: CineSearchConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage.data_dir));
        let sessions = SessionStore::with_keys(
            store.clone(),
            config.storage.token_key,
            config.storage.user_key,
        );

        Self {
            catalog: OmdbClient::new(&config.api),
            favorites: FavoritesStore::with_key(store.clone(), config.storage.favorites_key),
            history: SearchHistory::with_options(
                store,
                config.storage.history_key,
                config.display.history_limit,
            ),
            auth: AuthClient::new(&config.api, sessions),
            config,
        }
    }

    /// Browsing commands are only available to signed-in users.
    fn require_session(&self) -> cinesearch_core::Result<()> {
        self.auth.sessions().require_authenticated().map(|_| ())
    }
}

/// Handle the CLI command
///
/// # Errors
/// - `CineSearchError::Unauthenticated` - Browsing command without a session
/// - `CineSearchError::Validation` - Blank query or missing credentials
/// - `CineSearchError::Storage` - Favorites, history or session could not be saved
/// - `FavoriteError` - A title could not be fetched for saving
pub async fn handle_command(command: Commands, config: CineSearchConfig) -> anyhow::Result<()> {
    let app = App::new(config);

    match command {
        Commands::Search { query, page } => search(&app, &query, page).await,
        Commands::Quick { shortcut } => quick_search(&app, shortcut).await,
        Commands::Details { id } => show_details(&app, &id).await,
        Commands::Featured { watch } => show_featured(&app, watch).await,
        Commands::Favorites { action } => manage_favorites(&app, action).await,
        Commands::History { clear } => show_history(&app, clear),
        Commands::Register {
            email,
            password,
            name,
        } => register(&app, &email, &password, name.as_deref()).await,
        Commands::Login { email, password } => login(&app, &email, &password).await,
        Commands::Logout => logout(&app),
        Commands::Whoami => whoami(&app),
        Commands::Trailer { title } => show_trailer(&title),
    }
}

/// Message shown to the user for a failed command.
pub fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<CineSearchError>() {
        Some(e) => e.user_message(),
        None => error.to_string(),
    }
}

async fn search(app: &App, query: &str, page: u32) -> anyhow::Result<()> {
    app.require_session()?;

    let mut session = SearchSession::new(app.catalog.clone()).with_history(app.history.clone());
    session
        .submit(query)
        .await
        .map_err(CineSearchError::from)?;

    if page > 1 && !session.go_to_page(page).await {
        let total_pages = session
            .state()
            .pagination()
            .map_or(0, |p| p.total_pages);
        println!("Page {page} is out of range ({total_pages} pages available).");
        return Ok(());
    }

    print_listing(app, session.state());
    Ok(())
}

async fn quick_search(app: &App, shortcut: QuickSearch) -> anyhow::Result<()> {
    app.require_session()?;

    let mut session = SearchSession::new(app.catalog.clone());
    let state = session.quick_search(shortcut).await;
    print_listing(app, state);
    Ok(())
}

fn print_listing(app: &App, state: &SearchState) {
    match state.phase() {
        SearchPhase::ResultsReady => {
            println!("Results for \"{}\"", state.query());
            println!("{:-<60}", "");
            for movie in state.results() {
                print_summary(app, movie);
            }
            if let Some(pagination) = state.pagination() {
                println!();
                println!(
                    "Page {} of {} ({} results)",
                    pagination.page,
                    pagination.total_pages,
                    state.total_count()
                );
                if pagination.has_next {
                    println!(
                        "Next: cinesearch search \"{}\" --page {}",
                        state.query(),
                        pagination.page + 1
                    );
                }
            }
        }
        SearchPhase::NoResults => {
            println!("No results for \"{}\".", state.query());
            if let Some(error) = state.last_error() {
                println!("  ({error})");
            }
            let suggestions: Vec<&str> = QuickSearch::ALL.iter().map(|q| q.query()).collect();
            println!("Try one of: {}", suggestions.join(", "));
        }
        SearchPhase::Idle | SearchPhase::Searching => {}
    }
}

fn print_summary(app: &App, movie: &MovieSummary) {
    let mut badges = Vec::new();
    if app.favorites.contains(&movie.id) {
        badges.push("favorite");
    }
    if is_featured(&movie.id) {
        badges.push("featured");
    }
    if !movie.has_poster() {
        badges.push("no image");
    }

    let badges = if badges.is_empty() {
        String::new()
    } else {
        format!(" [{}]", badges.join(", "))
    };
    println!(
        "  {}  {} ({}) {}{}",
        movie.id, movie.title, movie.year, movie.media_type, badges
    );
}

async fn show_details(app: &App, id: &str) -> anyhow::Result<()> {
    app.require_session()?;

    let page = load_detail_page(&app.catalog, &app.favorites, id, app.config.display.related_limit).await;
    let Some(movie) = page.movie else {
        println!("Movie {id} could not be loaded.");
        return Ok(());
    };

    print_detail(&movie);
    println!(
        "Favorite:  {}",
        if page.is_favorite { "yes" } else { "no" }
    );
    if let Ok(url) = trailer_search_url(movie.title()) {
        println!("Trailer:   {url}");
    }

    if !page.related.is_empty() {
        println!();
        println!("Related titles");
        println!("{:-<60}", "");
        for related in &page.related {
            print_summary(app, related);
        }
    }
    Ok(())
}

fn print_detail(movie: &MovieDetail) {
    let unknown = "Unknown";
    println!("{} ({})", movie.title(), movie.summary.year);
    println!("{:-<60}", "");
    if movie.is_top_rated() {
        println!("Top rated");
    }
    if let Some(rating) = movie.rating {
        println!("Rating:    {rating:.1}/10");
    }
    for rating in &movie.ratings {
        println!("           {} {}", rating.value, rating.source);
    }
    println!("Genre:     {}", movie.genre.as_deref().unwrap_or(unknown));
    println!("Runtime:   {}", movie.runtime.as_deref().unwrap_or(unknown));
    println!("Released:  {}", movie.released.as_deref().unwrap_or(unknown));
    println!("Director:  {}", movie.director.as_deref().unwrap_or(unknown));
    if !movie.actors.is_empty() {
        println!("Cast:      {}", movie.actors.join(", "));
    }
    if let Some(awards) = &movie.awards {
        println!("Awards:    {awards}");
    }
    if let Some(plot) = &movie.plot {
        println!();
        println!("{plot}");
        println!();
    }
}

async fn show_featured(app: &App, watch: bool) -> anyhow::Result<()> {
    app.require_session()?;

    let (slides, sidebar) = tokio::join!(
        load_featured_carousel(&app.catalog),
        load_sidebar(&app.catalog, app.config.display.sidebar_limit)
    );

    println!("Featured");
    println!("{:-<60}", "");
    if slides.is_empty() {
        println!("  No featured titles available right now.");
    }
    for movie in &slides {
        print_summary(app, &movie.summary);
    }

    for (heading, movies) in [("Popular now", &sidebar.popular), ("Classics", &sidebar.classics)] {
        println!();
        println!("{heading}");
        println!("{:-<60}", "");
        for movie in movies {
            print_summary(app, &movie.summary);
        }
    }

    if watch {
        watch_carousel(Carousel::new(slides), app.config.display.carousel_interval).await?;
    }
    Ok(())
}

/// Prints each slide as the carousel rotates until Ctrl-C.
async fn watch_carousel(carousel: Carousel, period: Duration) -> anyhow::Result<()> {
    let shared = carousel.into_shared();
    let Some(_timer) = AutoAdvance::start(shared.clone(), period) else {
        return Ok(());
    };

    println!();
    println!("Rotating every {}s, press Ctrl-C to stop", period.as_secs());
    let mut shown = None;
    let mut poll = tokio::time::interval(Duration::from_millis(200));
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            _ = poll.tick() => {
                let carousel = shared.lock();
                if shown != Some(carousel.current_index()) {
                    shown = Some(carousel.current_index());
                    if let Some(movie) = carousel.current() {
                        println!(
                            "  [{}/{}] {} ({})",
                            carousel.current_index() + 1,
                            carousel.len(),
                            movie.title(),
                            movie.summary.year
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

async fn manage_favorites(app: &App, action: FavoritesCommand) -> anyhow::Result<()> {
    app.require_session()?;

    match action {
        FavoritesCommand::List => {
            let favorites = app.favorites.list();
            if favorites.is_empty() {
                println!("No favorites yet.");
                println!("Use 'cinesearch favorites add <id>' to save a title.");
                return Ok(());
            }
            println!("Favorites ({})", favorites.len());
            println!("{:-<60}", "");
            for movie in &favorites {
                let rating = movie
                    .rating
                    .map(|r| format!("{r:.1}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {}  {} ({})  {}",
                    movie.id(),
                    movie.title(),
                    movie.summary.year,
                    rating
                );
            }
        }
        FavoritesCommand::Add { id } => {
            if app.favorites.contains(&id) {
                println!("{id} is already a favorite.");
            } else {
                let movie = fetch_for_favorites(&app.catalog, &id).await?;
                app.favorites.add(movie.clone()).map_err(CineSearchError::from)?;
                println!("Added {} to favorites.", movie.title());
            }
        }
        FavoritesCommand::Remove { id } => {
            if app.favorites.remove(&id).map_err(CineSearchError::from)? {
                println!("Removed {id} from favorites.");
            } else {
                println!("{id} was not a favorite.");
            }
        }
        FavoritesCommand::Toggle { id } => {
            let added = toggle_favorite(&app.catalog, &app.favorites, &id)
                .await
                .map_err(favorite_failure)?;
            if added {
                println!("Added {id} to favorites.");
            } else {
                println!("Removed {id} from favorites.");
            }
        }
    }
    Ok(())
}

async fn fetch_for_favorites(catalog: &OmdbClient, id: &str) -> Result<MovieDetail, FavoriteError> {
    Ok(catalog.get_detail(id).await?)
}

// Storage failures get the same user-facing message as every other save
fn favorite_failure(error: FavoriteError) -> anyhow::Error {
    match error {
        FavoriteError::Storage(e) => CineSearchError::from(e).into(),
        other => other.into(),
    }
}

fn show_history(app: &App, clear: bool) -> anyhow::Result<()> {
    app.require_session()?;

    if clear {
        app.history.clear().map_err(CineSearchError::from)?;
        println!("Search history cleared.");
        return Ok(());
    }

    let entries = app.history.entries();
    if entries.is_empty() {
        println!("No recent searches.");
    }
    for entry in entries {
        println!("  {entry}");
    }
    Ok(())
}

async fn register(app: &App, email: &str, password: &str, name: Option<&str>) -> anyhow::Result<()> {
    if already_signed_in(app) {
        return Ok(());
    }
    report_auth(app.auth.register(email, password, name).await, "Account created")
}

async fn login(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    if already_signed_in(app) {
        return Ok(());
    }
    report_auth(app.auth.login(email, password).await, "Signed in")
}

fn already_signed_in(app: &App) -> bool {
    if !app.auth.is_authenticated() {
        return false;
    }
    match app.auth.current_user() {
        Some(user) => println!("Already signed in as {}.", user.display_name()),
        None => println!("Already signed in."),
    }
    println!("Use 'cinesearch logout' first to switch accounts.");
    true
}

fn report_auth(outcome: AuthOutcome, success: &str) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Success { user } => {
            println!("{success}. Welcome, {}!", user.display_name());
            Ok(())
        }
        AuthOutcome::Failure { message } => Err(anyhow::anyhow!(message)),
    }
}

fn logout(app: &App) -> anyhow::Result<()> {
    if !app.auth.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    app.auth.logout().map_err(CineSearchError::from)?;
    println!("Signed out.");
    Ok(())
}

fn whoami(app: &App) -> anyhow::Result<()> {
    match app.auth.current_user() {
        Some(user) if app.auth.is_authenticated() => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("  id: {}", user.id);
        }
        _ if app.auth.is_authenticated() => println!("Signed in (profile unavailable)."),
        _ => println!("Not signed in."),
    }
    Ok(())
}

fn show_trailer(title: &str) -> anyhow::Result<()> {
    let url = trailer_search_url(title)?;
    println!("{url}");
    Ok(())
}
