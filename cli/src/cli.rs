use clap::{Parser, Subcommand, ValueEnum};

use gateway::resources::enrollments::EnrollmentStatus;
use session::model::Role;

#[derive(Debug, Clone, ValueEnum)]
pub enum RoleCli {
    Admin,
    Teacher,
    Student,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum StatusCli {
    Active,
    Dropped,
    Pending,
}

/// Convert CLI role selection → session Role enum
pub(crate) fn cli_to_role(r: &RoleCli) -> Role {
    match r {
        RoleCli::Admin => Role::Admin,
        RoleCli::Teacher => Role::Teacher,
        RoleCli::Student => Role::Student,
    }
}

pub(crate) fn cli_to_status(s: &StatusCli) -> EnrollmentStatus {
    match s {
        StatusCli::Active => EnrollmentStatus::Active,
        StatusCli::Dropped => EnrollmentStatus::Dropped,
        StatusCli::Pending => EnrollmentStatus::Pending,
    }
}

#[derive(Debug, Parser)]
#[clap(name = "campus", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        /// Defaults to student when omitted
        #[clap(long, value_enum)]
        role: Option<RoleCli>,
    },

    /// Clear the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Update name and/or email on the current profile
    UpdateProfile {
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        email: Option<String>,
    },

    /// Change the account password
    ChangePassword {
        #[clap(long)]
        current: String,
        #[clap(long)]
        new: String,
    },

    #[clap(subcommand)]
    Classes(ClassesCmd),

    #[clap(subcommand)]
    Enrollments(EnrollmentsCmd),

    #[clap(subcommand)]
    Grades(GradesCmd),

    #[clap(subcommand)]
    Users(UsersCmd),
}

#[derive(Debug, Subcommand)]
pub enum ClassesCmd {
    /// List all classes
    List,
    /// Class detail, enrollments and grades included
    Show { id: i64 },
    /// Create a class (admin)
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        description: Option<String>,
    },
    /// Update name/description (admin)
    Update {
        id: i64,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        description: Option<String>,
    },
    /// Delete a class (admin)
    Delete { id: i64 },
    /// Put a teacher in charge of a class (admin)
    AssignTeacher {
        id: i64,
        #[clap(long)]
        teacher_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum EnrollmentsCmd {
    /// Enroll a student into a class
    Create {
        #[clap(long)]
        student_id: i64,
        #[clap(long)]
        class_id: i64,
    },
    /// Change an enrollment's status
    SetStatus {
        id: i64,
        #[clap(long, value_enum)]
        status: StatusCli,
    },
    /// All enrollments in a class
    ListForClass { class_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum GradesCmd {
    /// Submit a grade for an enrollment (class teacher)
    Submit {
        #[clap(long)]
        enrollment_id: i64,
        #[clap(long)]
        score: f64,
        #[clap(long)]
        remarks: Option<String>,
    },
    /// Update a grade (class teacher)
    Update {
        id: i64,
        #[clap(long)]
        score: Option<f64>,
        #[clap(long)]
        remarks: Option<String>,
    },
    /// All grades for an enrollment
    ListForEnrollment { enrollment_id: i64 },
    /// Remove a grade (class teacher)
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum UsersCmd {
    /// The profile behind the current token, from the server
    Me,
    /// List all accounts (admin)
    List,
    /// Search accounts by name or email
    Search { query: String },
}
