use anyhow::Result;
use colored::*;

use super::TemplateArgs;
use crate::import::write_template;

pub async fn handle_template_command(args: TemplateArgs) -> Result<()> {
    let schema = args.target.schema();
    write_template(schema, &args.output).await?;
    println!(
        "{} template written to {}",
        schema.label.bold(),
        args.output.display().to_string().bright_green()
    );
    Ok(())
}
