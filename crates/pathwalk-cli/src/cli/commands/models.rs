use pathwalk_core::model;

use crate::exit_codes;

pub fn run() -> anyhow::Result<i32> {
    for name in model::builtin_models() {
        let handle = model::resolve(name)?;
        println!("{name}");
        for action in handle.action_names() {
            println!("  {action}");
        }
    }
    Ok(exit_codes::SUCCESS)
}
