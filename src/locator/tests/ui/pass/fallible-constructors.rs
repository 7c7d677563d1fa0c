use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use locator::prelude::*;

pub trait Socket: Send + Sync + 'static {}

contract!(dyn Socket, "ui.Socket");

#[derive(Debug)]
pub struct Refused;

impl Display for Refused {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "connection refused")
    }
}

impl std::error::Error for Refused {}

pub struct TcpSocket;

#[component(name = "ui.TcpSocket", singleton, provides(dyn Socket))]
impl TcpSocket {
    #[inject]
    pub fn connect() -> Result<Self, Refused> {
        Err(Refused)
    }
}

impl Socket for TcpSocket {}

pub struct UdpSocket;

#[component(singleton, name = "ui.UdpSocket")]
impl UdpSocket {
    #[inject]
    pub fn bind() -> core::result::Result<UdpSocket, std::io::Error> {
        Ok(Self)
    }
}

pub struct LoopSocket;

#[component(provides(dyn Socket))]
impl LoopSocket {
    #[inject]
    pub fn open() -> std::result::Result<LoopSocket, Infallible> {
        Ok(LoopSocket)
    }
}

impl Socket for LoopSocket {}

pub struct Session {
    _primary: Arc<dyn Socket>,
    _backup: Option<Arc<dyn Socket>>,
}

#[component(name = "ui.Session")]
impl Session {
    #[inject]
    pub fn establish(
        #[qualified("primary")] primary: Arc<dyn Socket>,
        #[qualified("backup", 1)] backup: Option<Arc<dyn Socket>>,
    ) -> Result<Self, Refused> {
        Ok(Self {
            _primary: primary,
            _backup: backup,
        })
    }
}

fn instantiate_error<T, E>()
where
    T: Instantiate<Error = E>,
{
}

fn injectable<T: Injectable>() {}

fn main() {
    instantiate_error::<TcpSocket, Refused>();
    instantiate_error::<UdpSocket, std::io::Error>();
    instantiate_error::<LoopSocket, Infallible>();
    injectable::<Session>();

    let _: Scope = TcpSocket::SCOPE;
    let _: &'static str = Session::NAME;
}
