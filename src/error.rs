// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::error;
use std::fmt;
use std::io;

use roxmltree;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The source file could not be read.
    SourceUnreadable(io::Error),

    /// The input is not well-formed XML.
    MalformedMarkup(roxmltree::Error),

    /// The document has no root `svg` element.
    NoSvgElement,

    /// A path `d` attribute is empty or does not start with a moveto.
    MalformedPathData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::SourceUnreadable(ref e) => {
                write!(f, "failed to read the source file cause {}", e)
            }
            Error::MalformedMarkup(ref e) => {
                write!(f, "the input is not a well-formed XML cause {}", e)
            }
            Error::NoSvgElement => {
                write!(f, "the document does not have an SVG element")
            }
            Error::MalformedPathData => {
                write!(f, "the path data is empty or does not start with a moveto")
            }
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        "an SVG scene loading error"
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Error {
        Error::SourceUnreadable(value)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(value: roxmltree::Error) -> Error {
        Error::MalformedMarkup(value)
    }
}
