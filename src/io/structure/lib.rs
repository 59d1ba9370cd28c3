/* ************************************************************************ **
** This file is part of aimdx, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of aimdx is provided under this permissive         **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */


#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[cfg(test)] #[macro_use] extern crate aimdx_assert_close;

pub type FailResult<T> = Result<T, ::failure::Error>;

pub mod xdatcar;

pub use crate::xdatcar::{Xdatcar, XdatcarError, XdatcarErrorKind};
