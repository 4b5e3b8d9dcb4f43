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

pub mod args;

use args::parser::RegistryNodeArgs;
use pkgmanager::logging::log_headers;
use pkgmanager::node_api::error_util::custom_recover;
use pkgmanager::node_api::routes::make_node_routes;
use pkgmanager::registry_service::service::RegistryService;

use clap::Parser;
use log::{debug, info};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use warp::Filter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    debug!("Parse CLI arguments");
    let args = RegistryNodeArgs::parse();

    let address = SocketAddr::new(
        IpAddr::V4(args.host.parse::<Ipv4Addr>()?),
        args.port.parse::<u16>()?,
    );

    debug!("Create registry service");
    let registry_service = Arc::new(Mutex::new(RegistryService::new()));

    debug!("Setup HTTP routing");
    let node_api_routes = make_node_routes(registry_service);

    let (addr, server) = warp::serve(
        node_api_routes
            .and(log_headers())
            .recover(custom_recover)
            .with(warp::log("pkgmanager_registry")),
    )
    .bind_ephemeral(address);

    info!(
        "Package registry node will start running on {}:{}",
        addr.ip(),
        addr.port()
    );

    server.await;

    Ok(())
}
