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


use crate::FailResult;

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Adds a group of arguments to a clap app and later reads them back,
/// letting type inference connect the two halves.
pub trait CliDeserialize: Sized {
    fn augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> (clap::App<'a, 'b>, ClapDeserializer<Self>)
    {
        let app = Self::_augment_clap_app(app);
        (app, ClapDeserializer(PhantomData))
    }

    /// Don't use this. Call 'augment_clap_app' instead.
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>;
    /// Don't use this. Call 'resolve_args' on the ClapDeserializer instead.
    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>;
}

/// Token showing that a clap app was augmented with the arguments of `A`.
pub struct ClapDeserializer<A>(PhantomData<A>);

impl<A> ClapDeserializer<A>
where A: CliDeserialize,
{
    /// Read the arguments.  Implementations should not perform IO here.
    pub fn resolve_args(self, matches: &clap::ArgMatches<'_>) -> FailResult<A>
    { A::_resolve_args(matches) }
}

// Tuple as product combinator
impl<A, B> CliDeserialize for (A, B)
where
    A: CliDeserialize,
    B: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    {
        let app = A::_augment_clap_app(app);
        B::_augment_clap_app(app)
    }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?)) }
}

/// Parse the value of an optional single-valued argument.
pub fn parse_value_of<T>(matches: &clap::ArgMatches<'_>, name: &str) -> FailResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    matches.value_of(name)
        .map(|s| s.parse::<T>().map_err(|e| {
            format_err!("invalid value {:?} for {}: {}", s, name.replace('_', "-"), e)
        }))
        .transpose()
}

/// Parse every value of an optional multi-valued argument.
pub fn parse_values_of<T>(matches: &clap::ArgMatches<'_>, name: &str) -> FailResult<Option<Vec<T>>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match matches.values_of(name) {
        None => Ok(None),
        Some(values) => {
            let parsed = values
                .map(|s| s.parse::<T>().map_err(|e| {
                    format_err!("invalid value {:?} for {}: {}", s, name.replace('_', "-"), e)
                }))
                .collect::<FailResult<Vec<_>>>()?;
            Ok(Some(parsed))
        },
    }
}
