mod cli;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use gostrap_core::{ContentSource, Generator, GoModule, Prompter, Resolver, TemplateEngine};

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    println!(
        "{}",
        style("welcome to the gostrap guided project setup helper").cyan()
    );

    let dir = std::env::current_dir().context("cannot determine working directory")?;

    let module = match GoModule::probe(&dir) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("this working directory is not a recognized Go module");
            eprintln!("use 'go mod init my/super/module' first");
            return Err(e).context("cannot inspect this project");
        }
    };

    println!("your working directory is '{}'", dir.display());
    if cli.dev {
        println!("{}", style("DEV mode on").yellow());
    }

    let source = if cli.dev {
        ContentSource::dev(dir.clone())
    } else {
        ContentSource::remote(cli.base_url.clone())
    };
    let engine = TemplateEngine::new(source);
    let generator = Generator::new(dir.clone());

    let prompter = Prompter::new(io::stdin().lock());
    let mut resolver = Resolver::new(module, dir, cli.base_url, prompter);

    if resolver.prompter_mut().confirm("create makefile?")? {
        let text = engine.apply("Makefile.tmpl", &mut resolver)?;
        generator.write("Makefile", &text)?;
        println!("wrote Makefile");
    }

    let text = engine.apply_go("build.go.tmpl", &mut resolver)?;
    generator.write("build.go", &text)?;
    println!("wrote build.go");

    Ok(())
}
