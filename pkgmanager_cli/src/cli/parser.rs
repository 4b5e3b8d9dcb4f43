/*
   Copyright 2021 JFrog Ltd

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use clap::{arg, command, AppSettings, ArgMatches, Command};

pub fn cli_parser() -> ArgMatches {
    command!()
        .arg_required_else_help(true)
        .global_setting(AppSettings::DeriveDisplayOrder)
        .propagate_version(false)
        .subcommands(vec![
            Command::new("config")
                .short_flag('c')
                .about("Registry connection config commands")
                .arg_required_else_help(true)
                .args(&[
                    arg!(-a --add      "Adds a node configuration"),
                    arg!(-e --edit     "Edits a node configuration"),
                    arg!(-r --remove   "Removes the stored node configuration").visible_alias("rm"),
                    arg!(-s --show     "Shows the stored node configuration"),
                ]),
            Command::new("search")
                .short_flag('s')
                .about("Searches the registry for packages")
                .arg_required_else_help(true)
                .args(&[
                    arg!(--name <NAME> "The package name to search for, or * to enumerate every package"),
                    arg!(--version <VERSION> "A version query: exact (1.2.3), bounded range (1.2.3-2.1.0), carat (^1.2.3) or tilde (~1.2.0)").required(false),
                    arg!(--page <PAGE> "The page of results to fetch, starting at 1").required(false),
                ]),
            Command::new("upload")
                .short_flag('u')
                .about("Uploads a package zip to the registry")
                .arg_required_else_help(true)
                .args(&[arg!(--file <FILE> "Path of the package zip to upload")]),
            Command::new("create")
                .about("Asks the registry to ingest a package from a public repository URL")
                .arg_required_else_help(true)
                .args(&[arg!(--url <URL> "The public repository URL of the package")]),
            Command::new("download")
                .short_flag('d')
                .about("Downloads a package by its registry id")
                .arg_required_else_help(true)
                .args(&[
                    arg!(--id <ID> "The registry id of the package"),
                    arg!(--file <FILE> "Path to write the package zip to").required(false),
                ]),
            Command::new("update")
                .about("Replaces the content of a stored package version")
                .arg_required_else_help(true)
                .args(&[
                    arg!(--id <ID> "The registry id of the package"),
                    arg!(--file <FILE> "Path of the package zip to upload"),
                ]),
            Command::new("delete")
                .about("Deletes a package by id, or every version of a package by name")
                .arg_required_else_help(true)
                .args(&[
                    arg!(--id <ID> "The registry id of the package").required(false),
                    arg!(--name <NAME> "The package name").required(false),
                ]),
            Command::new("rate")
                .about("Fetches the rating of a package")
                .arg_required_else_help(true)
                .args(&[arg!(--id <ID> "The registry id of the package")]),
            Command::new("history")
                .about("Shows the action history of a package")
                .arg_required_else_help(true)
                .args(&[arg!(--name <NAME> "The package name")]),
            Command::new("regex")
                .about("Searches package names and readmes with a regular expression")
                .arg_required_else_help(true)
                .args(&[arg!(--query <REGEX> "The regular expression to search with")]),
            Command::new("review")
                .about("Adds or removes a package review")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommands(vec![
                    Command::new("add")
                        .about("Adds a review for a package")
                        .arg_required_else_help(true)
                        .args(&[
                            arg!(--user <USER> "The reviewing user"),
                            arg!(--package <PACKAGE> "The package name"),
                            arg!(--stars <STARS> "A star rating between 0 and 5"),
                            arg!(--text <TEXT> "The review text").required(false),
                        ]),
                    Command::new("remove")
                        .about("Removes a review for a package")
                        .arg_required_else_help(true)
                        .args(&[
                            arg!(--user <USER> "The reviewing user"),
                            arg!(--package <PACKAGE> "The package name"),
                        ]),
                ]),
            Command::new("reset").about("Empties the registry"),
            Command::new("ping").about("Pings the configured registry node"),
        ])
        .get_matches()
}
