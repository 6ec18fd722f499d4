use anyhow::{anyhow, Context};
use lectern_api::{
    AuthToken, CommentId, CommentView, Decision, Error, Intent, ModerationState, NewActor,
    Outcome, Role, SortOrder, ThreadView, Uuid,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Create an actor and print its auth token, needs ADMIN_TOKEN
    CreateActor {
        display_name: String,

        #[structopt(long, default_value = "learner")]
        role: Role,

        #[structopt(long)]
        avatar: Option<String>,
    },

    /// Show the comments of a discussion context
    Show {
        context: Uuid,

        /// recent or popular
        #[structopt(long, default_value = "recent")]
        order: SortOrder,
    },

    /// List the flagged comments of a discussion context
    Flagged { context: Uuid },

    /// Post a top-level comment
    Post { context: Uuid, body: String },

    Reply {
        context: Uuid,
        target: Uuid,
        body: String,
    },

    Edit {
        context: Uuid,
        target: Uuid,
        body: String,
    },

    /// Delete a comment along with all its replies
    Delete { context: Uuid, target: Uuid },

    /// Like a comment, or unlike it if already liked
    Like { context: Uuid, target: Uuid },

    Report {
        context: Uuid,
        target: Uuid,
        reason: String,
    },

    /// approve or reject a comment
    Moderate {
        context: Uuid,
        target: Uuid,
        decision: Decision,
    },
}

fn admin_token() -> anyhow::Result<AuthToken> {
    let tok =
        std::env::var("ADMIN_TOKEN").context("retrieving ADMIN_TOKEN environment variable")?;
    let tok = Uuid::try_parse(&tok).context("parsing ADMIN_TOKEN as an auth token")?;
    Ok(AuthToken(tok))
}

fn user_token() -> anyhow::Result<AuthToken> {
    let tok =
        std::env::var("LECTERN_TOKEN").context("retrieving LECTERN_TOKEN environment variable")?;
    let tok = Uuid::try_parse(&tok).context("parsing LECTERN_TOKEN as an auth token")?;
    Ok(AuthToken(tok))
}

/// Turns error responses into errors, using the server's explanation if it gave one
async fn check(res: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.bytes().await.context("reading error response")?;
    match Error::parse(&body) {
        Ok(err) => Err(anyhow::Error::new(err).context(format!("server answered {status}"))),
        Err(_) => Err(anyhow!("server answered {status}")),
    }
}

struct Client {
    http: reqwest::Client,
    host: String,
}

impl Client {
    async fn submit(&self, context: Uuid, intent: Intent) -> anyhow::Result<Outcome> {
        let res = self
            .http
            .post(format!("{}/api/contexts/{context}/intents", self.host))
            .bearer_auth(user_token()?.0)
            .json(&intent)
            .send()
            .await
            .with_context(|| format!("submitting {} intent", intent.name()))?;
        check(res).await?.json().await.context("parsing outcome")
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let res = self
            .http
            .get(format!("{}{path}", self.host))
            .bearer_auth(user_token()?.0)
            .send()
            .await
            .with_context(|| format!("fetching {path}"))?;
        check(res)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing answer to {path}"))
    }
}

fn print_comment(c: &CommentView, depth: usize) {
    let indent = "    ".repeat(depth);
    let mut notes = Vec::new();
    if c.liked_by_actor {
        notes.push(String::from("liked"));
    }
    if c.edited_at.is_some() {
        notes.push(String::from("edited"));
    }
    match c.moderation {
        ModerationState::Published => (),
        ModerationState::Flagged => notes.push(format!(
            "flagged: {}",
            c.report_reason.as_deref().unwrap_or("no reason")
        )),
        ModerationState::Rejected => notes.push(String::from("rejected")),
    }
    let notes = match notes.is_empty() {
        true => String::new(),
        false => format!(" [{}]", notes.join(", ")),
    };
    println!(
        "{indent}{} by {} on {}, {} likes{notes}",
        c.id.0,
        c.author.display_name,
        c.created_at.format("%Y-%m-%d %H:%M"),
        c.like_count,
    );
    for line in c.body.lines() {
        println!("{indent}  {line}");
    }
    for child in &c.children {
        print_comment(child, depth + 1);
    }
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Comment(c) => print_comment(&c, 0),
        Outcome::Done => println!("done"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = Client {
        http: reqwest::Client::new(),
        host: opt.host,
    };

    match opt.cmd {
        Command::CreateActor {
            display_name,
            role,
            avatar,
        } => {
            let res = client
                .http
                .post(format!("{}/api/admin/create-actor", client.host))
                .json(&NewActor {
                    display_name,
                    avatar,
                    role,
                })
                .bearer_auth(admin_token()?.0)
                .send()
                .await
                .context("creating actor")?;
            let token: AuthToken = check(res).await?.json().await.context("parsing token")?;
            println!("{}", token.0);
        }
        Command::Show { context, order } => {
            let thread: ThreadView = client
                .get(&format!("/api/contexts/{context}/comments?order={order}"))
                .await?;
            if thread.is_empty() {
                println!("no comments yet");
            }
            for c in &thread.comments {
                print_comment(c, 0);
            }
        }
        Command::Flagged { context } => {
            let flagged: ThreadView = client
                .get(&format!("/api/contexts/{context}/flagged"))
                .await?;
            for c in &flagged.comments {
                print_comment(c, 0);
            }
        }
        Command::Post { context, body } => {
            print_outcome(client.submit(context, Intent::AddComment { body }).await?)
        }
        Command::Reply {
            context,
            target,
            body,
        } => print_outcome(
            client
                .submit(
                    context,
                    Intent::Reply {
                        target: CommentId(target),
                        body,
                    },
                )
                .await?,
        ),
        Command::Edit {
            context,
            target,
            body,
        } => print_outcome(
            client
                .submit(
                    context,
                    Intent::Edit {
                        target: CommentId(target),
                        body,
                    },
                )
                .await?,
        ),
        Command::Delete { context, target } => print_outcome(
            client
                .submit(
                    context,
                    Intent::Delete {
                        target: CommentId(target),
                    },
                )
                .await?,
        ),
        Command::Like { context, target } => print_outcome(
            client
                .submit(
                    context,
                    Intent::ToggleLike {
                        target: CommentId(target),
                    },
                )
                .await?,
        ),
        Command::Report {
            context,
            target,
            reason,
        } => print_outcome(
            client
                .submit(
                    context,
                    Intent::Report {
                        target: CommentId(target),
                        reason,
                    },
                )
                .await?,
        ),
        Command::Moderate {
            context,
            target,
            decision,
        } => print_outcome(
            client
                .submit(
                    context,
                    Intent::Moderate {
                        target: CommentId(target),
                        decision,
                    },
                )
                .await?,
        ),
    }

    Ok(())
}
