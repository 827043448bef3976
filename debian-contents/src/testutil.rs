// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    async_compression::futures::bufread::GzipEncoder,
    futures::{
        io::{BufReader, Cursor},
        AsyncReadExt,
    },
};

/// Gzip compress a buffer.
pub async fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzipEncoder::new(BufReader::new(Cursor::new(data.to_vec())));

    let mut res = vec![];
    encoder
        .read_to_end(&mut res)
        .await
        .expect("compression should succeed");

    res
}
