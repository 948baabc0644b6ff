mod pages;

use anyhow::Result;
use api_client::{AdminClient, ClientConfig};
use clap::{Args, Parser, Subcommand};
use domain::forms::{
    ArticleForm, FaqForm, InquiryAnswerForm, LoginForm, NoticeForm, PublicMemberForm, VideoForm,
};
use domain::{ListQuery, Page};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pages::{FormMode, Outcome, SubmitGuard};

#[derive(Parser)]
#[command(name = "admin-console", author, version, about)]
struct Cli {
    /// Backend base URL, overriding ADMIN_API_URL and the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out; the local session is removed even if the server is unreachable
    Logout,
    /// Exchange the refresh token for new tokens
    Refresh,
    /// Show the signed-in administrator
    Whoami,
    /// Board notices
    #[command(subcommand)]
    Notices(Crud<NoticeArgs>),
    /// Board FAQs
    #[command(subcommand)]
    Faqs(Crud<FaqArgs>),
    /// Customer inquiries
    #[command(subcommand)]
    Inquiries(InquiryCommand),
    /// Public site members
    #[command(subcommand)]
    Members(Crud<MemberArgs>),
    #[command(subcommand)]
    Articles(Crud<ArticleArgs>),
    #[command(subcommand)]
    Videos(Crud<VideoArgs>),
}

#[derive(Subcommand)]
enum Crud<A: Args> {
    List(ListArgs),
    Get {
        id: i64,
    },
    Create(A),
    Update {
        id: i64,
        #[command(flatten)]
        fields: A,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum InquiryCommand {
    List(ListArgs),
    Get {
        id: i64,
    },
    /// Reply to an inquiry and mark it answered
    Answer {
        id: i64,
        #[arg(long)]
        answer: String,
    },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    ordering: Option<String>,
    /// Extra query parameter, repeatable
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_pair)]
    filters: Vec<(String, String)>,
}

impl From<ListArgs> for ListQuery {
    fn from(args: ListArgs) -> Self {
        ListQuery {
            page: args.page,
            page_size: args.page_size,
            search: args.search,
            ordering: args.ordering,
            extra: args.filters,
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

#[derive(Args)]
struct NoticeArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long)]
    important: bool,
}

#[derive(Args)]
struct FaqArgs {
    #[arg(long)]
    question: String,
    #[arg(long)]
    answer: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    order: Option<i32>,
}

#[derive(Args)]
struct MemberArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, env = "MEMBER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    inactive: bool,
}

#[derive(Args)]
struct ArticleArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    thumbnail: Option<String>,
    #[arg(long)]
    publish: bool,
}

#[derive(Args)]
struct VideoArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    url: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    thumbnail: Option<String>,
    /// Running time in seconds
    #[arg(long)]
    duration: Option<u32>,
    #[arg(long)]
    publish: bool,
}

fn mode_for(id: Option<i64>) -> FormMode {
    id.map_or(FormMode::Create, FormMode::Edit)
}

/// Prints a finished action; an error toast becomes the process error.
fn report(outcome: Outcome) -> Result<()> {
    if let Some(toast) = &outcome.toast {
        if toast.is_error() {
            anyhow::bail!("{}", toast.message());
        }
        println!("{toast}");
    }
    if let Some(route) = outcome.navigate_to {
        println!("next: {route}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_page<T>(page: &Page<T>, row: impl Fn(&T) -> String) {
    for item in &page.results {
        println!("{}", row(item));
    }
    println!("-- {} shown, {} total", page.results.len(), page.count);
    if let Some(next) = &page.next {
        println!("-- next: {next}");
    }
}

async fn notices(client: &AdminClient, cmd: Crud<NoticeArgs>) -> Result<()> {
    let board = client.board();
    let (id, args) = match cmd {
        Crud::List(args) => {
            let page = board.list_notices(&args.into()).await?;
            print_page(&page, |n| {
                let flag = if n.is_important { "!" } else { " " };
                format!("{:>6} {flag} {}", n.id, n.title)
            });
            return Ok(());
        }
        Crud::Get { id } => return print_json(&board.get_notice(id).await?),
        Crud::Delete { id } => {
            let guard = SubmitGuard::default();
            let outcome = pages::board::delete_notice(&guard, &board, id).await;
            return report(outcome);
        }
        Crud::Create(args) => (None, args),
        Crud::Update { id, fields } => (Some(id), fields),
    };
    let form = NoticeForm {
        title: args.title,
        content: args.content,
        is_important: args.important,
    };
    report(pages::board::NoticeFormPage::new(&board, mode_for(id)).submit(&form).await)
}

async fn faqs(client: &AdminClient, cmd: Crud<FaqArgs>) -> Result<()> {
    let board = client.board();
    let (id, args) = match cmd {
        Crud::List(args) => {
            let page = board.list_faqs(&args.into()).await?;
            print_page(&page, |f| format!("{:>6} {}", f.id, f.question));
            return Ok(());
        }
        Crud::Get { id } => return print_json(&board.get_faq(id).await?),
        Crud::Delete { id } => {
            let guard = SubmitGuard::default();
            let outcome = pages::board::delete_faq(&guard, &board, id).await;
            return report(outcome);
        }
        Crud::Create(args) => (None, args),
        Crud::Update { id, fields } => (Some(id), fields),
    };
    let form = FaqForm {
        question: args.question,
        answer: args.answer,
        category: args.category,
        order: args.order,
    };
    report(pages::board::FaqFormPage::new(&board, mode_for(id)).submit(&form).await)
}

async fn inquiries(client: &AdminClient, cmd: InquiryCommand) -> Result<()> {
    let board = client.board();
    match cmd {
        InquiryCommand::List(args) => {
            let page = board.list_inquiries(&args.into()).await?;
            print_page(&page, |i| format!("{:>6} {:?} {}", i.id, i.status, i.title));
            Ok(())
        }
        InquiryCommand::Get { id } => print_json(&board.get_inquiry(id).await?),
        InquiryCommand::Answer { id, answer } => {
            let form = InquiryAnswerForm { answer };
            report(pages::board::InquiryAnswerPage::new(&board, id).submit(&form).await)
        }
    }
}

async fn members(client: &AdminClient, cmd: Crud<MemberArgs>) -> Result<()> {
    let members = client.members();
    let (id, args) = match cmd {
        Crud::List(args) => {
            let page = members.list(&args.into()).await?;
            print_page(&page, |m| format!("{:>6} {} <{}>", m.id, m.username, m.email));
            return Ok(());
        }
        Crud::Get { id } => return print_json(&members.get(id).await?),
        Crud::Delete { id } => {
            let guard = SubmitGuard::default();
            let outcome = pages::members::delete_member(&guard, &members, id).await;
            return report(outcome);
        }
        Crud::Create(args) => (None, args),
        Crud::Update { id, fields } => (Some(id), fields),
    };
    let form = PublicMemberForm {
        username: args.username,
        name: args.name,
        email: args.email,
        phone: args.phone,
        password: args.password,
        is_active: !args.inactive,
    };
    report(pages::members::MemberFormPage::new(&members, mode_for(id)).submit(&form).await)
}

async fn articles(client: &AdminClient, cmd: Crud<ArticleArgs>) -> Result<()> {
    let articles = client.articles();
    let (id, args) = match cmd {
        Crud::List(args) => {
            let page = articles.list(&args.into()).await?;
            print_page(&page, |a| {
                let state = if a.is_published { "P" } else { "-" };
                format!("{:>6} {state} {}", a.id, a.title)
            });
            return Ok(());
        }
        Crud::Get { id } => return print_json(&articles.get(id).await?),
        Crud::Delete { id } => {
            let guard = SubmitGuard::default();
            let outcome = pages::content::delete_article(&guard, &articles, id).await;
            return report(outcome);
        }
        Crud::Create(args) => (None, args),
        Crud::Update { id, fields } => (Some(id), fields),
    };
    let form = ArticleForm {
        title: args.title,
        content: args.content,
        author: args.author,
        category: args.category,
        thumbnail: args.thumbnail,
        is_published: args.publish,
    };
    report(pages::content::ArticleFormPage::new(&articles, mode_for(id)).submit(&form).await)
}

async fn videos(client: &AdminClient, cmd: Crud<VideoArgs>) -> Result<()> {
    let videos = client.videos();
    let (id, args) = match cmd {
        Crud::List(args) => {
            let page = videos.list(&args.into()).await?;
            print_page(&page, |v| format!("{:>6} {} {}", v.id, v.title, v.video_url));
            return Ok(());
        }
        Crud::Get { id } => return print_json(&videos.get(id).await?),
        Crud::Delete { id } => {
            let guard = SubmitGuard::default();
            let outcome = pages::content::delete_video(&guard, &videos, id).await;
            return report(outcome);
        }
        Crud::Create(args) => (None, args),
        Crud::Update { id, fields } => (Some(id), fields),
    };
    let form = VideoForm {
        title: args.title,
        video_url: args.url,
        description: args.description,
        thumbnail: args.thumbnail,
        duration: args.duration,
        is_published: args.publish,
    };
    report(pages::content::VideoFormPage::new(&videos, mode_for(id)).submit(&form).await)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::load()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }
    let client = AdminClient::from_config(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            report(pages::auth::LoginPage::new(&client).submit(&form).await)?;
        }
        Commands::Logout => report(pages::auth::logout(&client).await)?,
        Commands::Refresh => report(pages::auth::refresh(&client).await)?,
        Commands::Whoami => match client.tokens().get_user() {
            Some(user) if client.tokens().is_authenticated() => {
                let role = if user.is_admin { " (admin)" } else { "" };
                println!("{} <{}> level {}{role}", user.name, user.email, user.level);
            }
            _ if client.tokens().is_authenticated() => println!("Logged in (no cached profile)"),
            _ => println!("Not logged in"),
        },
        Commands::Notices(cmd) => notices(&client, cmd).await?,
        Commands::Faqs(cmd) => faqs(&client, cmd).await?,
        Commands::Inquiries(cmd) => inquiries(&client, cmd).await?,
        Commands::Members(cmd) => members(&client, cmd).await?,
        Commands::Articles(cmd) => articles(&client, cmd).await?,
        Commands::Videos(cmd) => videos(&client, cmd).await?,
    }
    Ok(())
}
