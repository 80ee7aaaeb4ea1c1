//! Create a user and a goal, list goals and complete a task against the Data Connect emulator.
//! Start the emulator first (`firebase emulators:start --only dataconnect`). Without
//! `FIREBASE_DATA_CONNECT_EMULATOR_HOST` the demo targets `http://localhost:9399`.

use goals_dataconnect::app::{initialize_app, FirebaseAppSettings, FirebaseOptions};
use goals_dataconnect::data_connect::{
    connect_data_connect_emulator, get_data_connect, EMULATOR_HOST_ENV_VAR,
};
use goals_dataconnect::dataconnect_generated::{
    connector_config, create_goal, create_user, date_string, get_goals, update_task,
    CreateGoalVariables, CreateUserVariables, UpdateTaskVariables,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Placeholder credentials; the emulator does not check them.
    let app = initialize_app(
        FirebaseOptions {
            api_key: Some("demo-api-key".into()),
            project_id: Some("demo-project".into()),
            ..Default::default()
        },
        Some(FirebaseAppSettings::default()),
    )?;

    // The generated functions fall back to this instance when passed `None`.
    let dc = get_data_connect(Some(app), connector_config().clone())?;
    if dc.is_emulator() {
        println!("Using emulator from {EMULATOR_HOST_ENV_VAR}");
    } else {
        connect_data_connect_emulator(&dc, "localhost", Some(9399), false)?;
    }

    let user = create_user(
        None,
        CreateUserVariables::new("Ada Lovelace").with_email("ada@example.com"),
    )
    .await?;
    println!("Created user {}", user.data.user_insert.id);

    let target_date = chrono::Utc::now().date_naive() + chrono::Days::new(30);
    let goal = create_goal(
        Some(dc.clone()),
        CreateGoalVariables::new("Run 5k", "active", date_string(target_date))
            .with_priority("high")
            .with_null_description(),
    )
    .await?;
    println!("Created goal {}", goal.data.goal_insert.id);

    let goals = get_goals(None).await?;
    println!("{} goal(s) as of {}", goals.data.goals.len(), goals.fetch_time_rfc3339());
    for goal in &goals.data.goals {
        println!(
            " - {} [{}] due {} priority {}",
            goal.title,
            goal.status,
            goal.target_date,
            goal.priority().unwrap_or("-")
        );
    }

    let task_id = std::env::var("TASK_ID")
        .unwrap_or_else(|_| "00000000-0000-0000-0000-000000000000".into());
    let updated = update_task(Some(dc), UpdateTaskVariables::new(task_id, true)).await?;
    match updated.data.task_update {
        Some(task) => println!("Completed task {}", task.id),
        None => println!("No task matched that id"),
    }

    Ok(())
}
