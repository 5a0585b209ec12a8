pub mod cli;
pub mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use common::logger::init_logger;
use gateway::auth::{AuthClient, Credentials, NewAccount, RegisterOutcome};
use gateway::client::{GatewayClient, GatewayConfig};
use gateway::nav::RouteCell;
use gateway::notify::LogNotifier;
use gateway::resources::classes::{ClassUpdate, ClassesApi, NewClass};
use gateway::resources::enrollments::{EnrollmentsApi, NewEnrollment};
use gateway::resources::grades::{GradeUpdate, GradesApi, NewGrade};
use gateway::resources::users::UsersApi;
use session::manager::SessionManager;
use session::model::ProfilePatch;
use session::store::sqlite_store::SqliteSessionStore;

use cli::*;
use config::AppConfig;

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_classes(cmd: ClassesCmd, api: ClassesApi) -> anyhow::Result<()> {
    match cmd {
        ClassesCmd::List => print_json(&api.list().await?),
        ClassesCmd::Show { id } => print_json(&api.get(id).await?),
        ClassesCmd::Create { name, description } => {
            print_json(&api.create(&NewClass { name, description }).await?)
        }
        ClassesCmd::Update {
            id,
            name,
            description,
        } => print_json(&api.update(id, &ClassUpdate { name, description }).await?),
        ClassesCmd::Delete { id } => {
            api.delete(id).await?;
            println!("class {id} deleted");
            Ok(())
        }
        ClassesCmd::AssignTeacher { id, teacher_id } => {
            print_json(&api.assign_teacher(id, teacher_id).await?)
        }
    }
}

async fn run_enrollments(cmd: EnrollmentsCmd, api: EnrollmentsApi) -> anyhow::Result<()> {
    match cmd {
        EnrollmentsCmd::Create {
            student_id,
            class_id,
        } => print_json(
            &api.enroll(&NewEnrollment {
                student_id,
                class_id,
            })
            .await?,
        ),
        EnrollmentsCmd::SetStatus { id, status } => {
            print_json(&api.set_status(id, cli_to_status(&status)).await?)
        }
        EnrollmentsCmd::ListForClass { class_id } => {
            print_json(&api.list_for_class(class_id).await?)
        }
    }
}

async fn run_grades(cmd: GradesCmd, api: GradesApi) -> anyhow::Result<()> {
    match cmd {
        GradesCmd::Submit {
            enrollment_id,
            score,
            remarks,
        } => print_json(
            &api.submit(&NewGrade {
                enrollment_id,
                score,
                remarks,
            })
            .await?,
        ),
        GradesCmd::Update { id, score, remarks } => {
            print_json(&api.update(id, &GradeUpdate { score, remarks }).await?)
        }
        GradesCmd::ListForEnrollment { enrollment_id } => {
            print_json(&api.list_for_enrollment(enrollment_id).await?)
        }
        GradesCmd::Delete { id } => {
            api.delete(id).await?;
            println!("grade {id} deleted");
            Ok(())
        }
    }
}

async fn run_users(cmd: UsersCmd, api: UsersApi) -> anyhow::Result<()> {
    match cmd {
        UsersCmd::Me => print_json(&api.me().await?),
        UsersCmd::List => print_json(&api.list().await?),
        UsersCmd::Search { query } => print_json(&api.search(&query).await?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("campus-cli");

    let cli = Cli::parse();
    let cfg = AppConfig::from_env();

    let store = Arc::new(SqliteSessionStore::new(&cfg.session_db_url).await?);
    let sessions = Arc::new(SessionManager::new(store));
    sessions.initialize().await?;

    let gateway_cfg = GatewayConfig::new(cfg.api_base_url.clone())
        .with_timeout(Duration::from_millis(cfg.request_timeout_ms));

    let gateway = Arc::new(GatewayClient::new(
        gateway_cfg,
        sessions.clone(),
        Arc::new(LogNotifier),
        Arc::new(RouteCell::new("/")),
    )?);

    let auth = AuthClient::new(gateway.clone(), sessions.clone());

    match cli.command {
        Command::Login { email, password } => {
            let session = auth.login(&Credentials { email, password }).await?;
            println!("Logged in as {} ({})", session.user.name, session.user.role);
        }

        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let account = NewAccount {
                name,
                email,
                password,
                role: role.as_ref().map(cli_to_role),
            };
            match auth.register(&account).await? {
                RegisterOutcome::Authenticated(session) => {
                    println!("Registered and logged in as {}", session.user.email);
                }
                RegisterOutcome::Registered { message } => println!("{message}"),
            }
        }

        Command::Logout => {
            auth.logout().await;
            println!("Logged out");
        }

        Command::Whoami => match auth.current_session() {
            Some(session) => println!(
                "{} <{}> role={}",
                session.user.name, session.user.email, session.user.role
            ),
            None => println!("Not logged in"),
        },

        Command::UpdateProfile { name, email } => {
            if auth.current_session().is_none() {
                println!("Not logged in");
            } else {
                auth.update_profile(&ProfilePatch { name, email }).await?;
                println!("Profile updated");
            }
        }

        Command::ChangePassword { current, new } => {
            auth.change_password(&current, &new).await?;
            println!("Password changed");
        }

        Command::Classes(cmd) => run_classes(cmd, ClassesApi::new(gateway.clone())).await?,
        Command::Enrollments(cmd) => {
            run_enrollments(cmd, EnrollmentsApi::new(gateway.clone())).await?
        }
        Command::Grades(cmd) => run_grades(cmd, GradesApi::new(gateway.clone())).await?,
        Command::Users(cmd) => run_users(cmd, UsersApi::new(gateway.clone())).await?,
    }

    Ok(())
}
