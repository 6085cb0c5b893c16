use clap::Subcommand;
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
    },
    /// End the current session
    Signout,
    /// Send a password reset email
    Reset {
        #[arg(long)]
        email: String,
    },
    /// Show the signed-in user
    Status,
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: AuthAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Signin { email, password } => {
            let user = tracker.sign_in(&email, &password)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        AuthAction::Signup {
            email,
            password,
            username,
        } => {
            let user = tracker.sign_up(&email, &password, &username)?;
            if tracker.current_user().is_none() {
                eprintln!("check your email to confirm the account");
            }
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        AuthAction::Signout => {
            tracker.sign_out()?;
            println!("signed out");
        }
        AuthAction::Reset { email } => {
            tracker.reset_password(&email)?;
            println!("password reset email sent to {email}");
        }
        AuthAction::Status => match tracker.current_user() {
            Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
            None => println!("not signed in"),
        },
    }
    Ok(())
}
