use api::{BlogClient, models::split_featured};
use clap::{Parser, Subcommand};
use server::{config::Config, guard::NavigationRequest, matcher::Matcher};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the gateway (default)
    Serve,

    /// Print what the guard does with a single request
    Check {
        path: String,

        /// Pretend a `token` cookie is present
        #[arg(long)]
        cookie: bool,
    },

    /// List posts from the blog backend
    Posts {
        #[arg(long)]
        author: Option<String>,
    },

    /// Show one post from the blog backend
    Post { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => server::start_server().await?,
        Command::Check { path, cookie } => {
            let config = Config::load()?;
            let matcher = Matcher::new(config.guard_exclude);

            if matcher.is_guarded(&path) {
                println!("{}", NavigationRequest::new(path, cookie).evaluate());
            } else {
                println!("excluded");
            }
        }
        Command::Posts { author } => {
            let client = BlogClient::new(Config::load()?.backend_url)?;

            let posts = match author {
                Some(author) => client.author_posts(&author).await?,
                None => client.all_posts().await?,
            };

            let (featured, rest) = split_featured(&posts);

            if let Some(post) = featured {
                println!("Featured: {}  {}  by {}\n", post.id, post.title, post.author.name);
            }

            for post in rest {
                println!("{}  {}  by {}", post.id, post.title, post.author.name);
            }
        }
        Command::Post { id } => {
            let client = BlogClient::new(Config::load()?.backend_url)?;
            let post = client.post(&id).await?;

            println!("{}", post.title);
            println!("by {} on {}\n", post.author.name, post.created_at.format("%Y-%m-%d"));
            println!("{}", post.content);
        }
    }

    Ok(())
}
