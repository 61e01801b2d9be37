use clap::Parser;
use feed_client::FeedApi;
use feed_client::http_client::FeedClientHttp;
use feed_client::listing::post_count_label;
use feed_client::models::{PaginationState, PostsQuery, UserSearchQuery};
use feed_client::page_window::{PageSlot, page_window};
use feed_client::search::{HINT_TEXT, NO_RESULTS_TEXT, meets_minimum};

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    ListPosts {
        #[clap(long)]
        page: Option<u64>,
        #[clap(long)]
        page_size: Option<u64>,
        #[clap(long)]
        author_id: Option<i64>,
    },
    GetPost {
        id: i64,
    },
    DeletePost {
        id: i64,
    },
    SearchUsers {
        query: String,
        #[clap(long, default_value_t = 1)]
        page: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let client = FeedClientHttp::connect(&args.server)?;

    match args.command {
        Command::ListPosts {
            page,
            page_size,
            author_id,
        } => {
            let query = PostsQuery {
                page,
                page_size,
                author_id,
            };
            let posts = client.list_posts(&query).await?;
            println!("Posts ({} total)", posts.pagination.total_items);
            for post in &posts.items {
                println!("- [{}] {} (by {})", post.id, post.title, post.author.name);
            }
            if let Some(footer) = pager(&posts.pagination) {
                println!("{footer}");
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            println!("{}", post.title);
            println!("by {} (@{})", post.author.name, post.author.username);
            println!();
            println!("{}", post.body);
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
        Command::SearchUsers { query, page } => {
            if !meets_minimum(&query) {
                println!("{HINT_TEXT}");
                return Ok(());
            }
            let mut request = UserSearchQuery::first_page(query);
            request.page = page;
            let users = client.search_users(&request).await?;
            if users.items.is_empty() {
                println!("{NO_RESULTS_TEXT}");
            }
            for user in &users.items {
                println!(
                    "- [{}] {} (@{}), {}",
                    user.id,
                    user.name,
                    user.username,
                    post_count_label(user.post_count)
                );
            }
            if let Some(footer) = pager(&users.pagination) {
                println!("{footer}");
            }
        }
    }

    Ok(())
}

fn pager(pagination: &PaginationState) -> Option<String> {
    let slots = page_window(pagination.page, pagination.total_pages);
    if slots.is_empty() {
        return None;
    }
    let pages: Vec<String> = slots
        .into_iter()
        .map(|slot| match slot {
            PageSlot::Page(n) if n == pagination.page => format!("[{n}]"),
            PageSlot::Page(n) => n.to_string(),
            PageSlot::Ellipsis => "...".to_string(),
        })
        .collect();
    Some(format!(
        "Page {} of {}: {}",
        pagination.page,
        pagination.total_pages,
        pages.join(" ")
    ))
}
